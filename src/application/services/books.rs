use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::books::{BookPost, BookPostWithOwner, NewBookPost, valid_rating};
use crate::domain::feed::{FeedRequest, Page};
use crate::domain::ids::{BookPostId, UserId};
use crate::domain::repositories::BookPostRepository;
use crate::infrastructure::images::ImageStore;

/// Client payload for creating a post. `image` carries the raw image data
/// (a data URL); it is uploaded to the hosting provider before anything is
/// persisted.
#[derive(Debug, Deserialize)]
pub struct NewBookSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<i32>,
}

/// Paginated listing and ownership-checked mutation of book posts.
#[derive(Clone)]
pub struct BookService {
    posts: Arc<dyn BookPostRepository>,
    images: ImageStore,
}

impl BookService {
    pub fn new(posts: Arc<dyn BookPostRepository>, images: ImageStore) -> Self {
        Self { posts, images }
    }

    pub async fn create(
        &self,
        owner: UserId,
        submission: NewBookSubmission,
    ) -> Result<BookPost, AppError> {
        let rating = submission.rating.filter(|&r| r != 0);
        if submission.title.is_empty()
            || submission.caption.is_empty()
            || submission.image.is_empty()
            || rating.is_none()
        {
            return Err(AppError::validation("All fields are required"));
        }

        // rating.is_none() was just ruled out
        #[allow(clippy::unwrap_used)]
        let rating = rating.unwrap();
        if !valid_rating(rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        // Upload before persisting; the stored image field is the hosted URL.
        let hosted = self.images.upload(&submission.image).await.map_err(|err| {
            warn!(error = %err, "image upload failed");
            AppError::UploadProvider("Error uploading image".to_string())
        })?;

        self.posts
            .insert(NewBookPost {
                title: submission.title,
                caption: submission.caption,
                image_url: hosted.secure_url,
                rating,
                user_id: owner,
            })
            .await
            .map_err(AppError::from)
    }

    pub async fn feed(&self, request: FeedRequest) -> Result<Page<BookPostWithOwner>, AppError> {
        self.posts.list(request).await.map_err(AppError::from)
    }

    pub async fn posts_for(&self, owner: UserId) -> Result<Vec<BookPost>, AppError> {
        self.posts.list_by_user(owner).await.map_err(AppError::from)
    }

    pub async fn delete(&self, requester: UserId, id: BookPostId) -> Result<(), AppError> {
        let post = match self.posts.get(id).await {
            Ok(post) => post,
            Err(RepositoryError::NotFound) => {
                return Err(AppError::not_found("Book not found"));
            }
            Err(err) => return Err(AppError::from(err)),
        };

        if post.user_id != requester {
            return Err(AppError::not_authorized("Not authorized"));
        }

        // Destroy the hosted image first; a provider failure aborts the
        // delete so the record never points at a half-removed asset.
        if let Some(public_id) = self.images.hosted_public_id(&post.image_url) {
            self.images.destroy(&public_id).await.map_err(|err| {
                warn!(error = %err, %id, "failed to delete hosted image");
                AppError::UploadProvider("Error deleting hosted image".to_string())
            })?;
        }

        let deleted = self.posts.delete(id).await.map_err(AppError::from)?;
        if !deleted {
            // A concurrent delete got there first.
            return Err(AppError::not_found("Book not found"));
        }

        Ok(())
    }
}
