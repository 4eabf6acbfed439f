use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ids::{BookPostId, UserId};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A book recommendation post. The owning user reference is immutable after
/// creation; the image URL always points at the hosting provider, never at a
/// raw payload.
#[derive(Debug, Clone, Serialize)]
pub struct BookPost {
    pub id: BookPostId,
    pub title: String,
    pub caption: String,
    pub image_url: String,
    pub rating: i32,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookPost {
    pub title: String,
    pub caption: String,
    pub image_url: String,
    pub rating: i32,
    pub user_id: UserId,
}

/// Minimal owner projection embedded in feed listings. Only the fields needed
/// for display; never the owner's email or password hash.
#[derive(Debug, Clone, Serialize)]
pub struct PostOwner {
    pub username: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookPostWithOwner {
    #[serde(flatten)]
    pub post: BookPost,
    pub user: PostOwner,
}

pub fn valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
