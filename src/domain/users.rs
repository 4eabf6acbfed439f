use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ids::UserId;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Full identity record. Deliberately not `Serialize`: the password hash must
/// never appear in any output, so responses go through [`PublicUser`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: String,
}

/// The outward projection of a user returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
        }
    }
}

/// Avatar URL derived deterministically from the username at registration.
pub fn avatar_url_for(username: &str) -> String {
    format!("https://api.dicebear.com/5.x/initials/svg?seed={username}")
}
