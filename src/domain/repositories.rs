use async_trait::async_trait;

use crate::domain::RepositoryError;
use crate::domain::books::{BookPost, BookPostWithOwner, NewBookPost};
use crate::domain::feed::{FeedRequest, Page};
use crate::domain::ids::{BookPostId, UserId};
use crate::domain::users::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. The storage layer's uniqueness constraints are the
    /// authority for duplicate detection; a racing duplicate insert must fail
    /// with the matching `DuplicateEmail`/`DuplicateUsername` error.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait BookPostRepository: Send + Sync {
    async fn insert(&self, post: NewBookPost) -> Result<BookPost, RepositoryError>;
    async fn get(&self, id: BookPostId) -> Result<BookPost, RepositoryError>;
    /// The paginated feed, strictly newest-first, with each post's owner
    /// resolved to its public projection.
    async fn list(&self, request: FeedRequest) -> Result<Page<BookPostWithOwner>, RepositoryError>;
    /// All posts owned by one user, newest-first.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<BookPost>, RepositoryError>;
    /// Idempotent delete-by-id. Returns whether a record was actually removed,
    /// so a racing second delete observes `false` rather than an error.
    async fn delete(&self, id: BookPostId) -> Result<bool, RepositoryError>;
}
