use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar};

use crate::domain::RepositoryError;
use crate::domain::books::{BookPost, BookPostWithOwner, NewBookPost, PostOwner};
use crate::domain::feed::{FeedRequest, Page};
use crate::domain::ids::{BookPostId, UserId};
use crate::domain::repositories::BookPostRepository;
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlBookPostRepository {
    pool: DatabasePool,
}

impl SqlBookPostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_post(record: BookPostRecord) -> BookPost {
        BookPost {
            id: BookPostId::from(record.id),
            title: record.title,
            caption: record.caption,
            image_url: record.image_url,
            rating: record.rating,
            user_id: UserId::from(record.user_id),
            created_at: record.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookPostRecord {
    id: i64,
    title: String,
    caption: String,
    image_url: String,
    rating: i32,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct FeedRecord {
    id: i64,
    title: String,
    caption: String,
    image_url: String,
    rating: i32,
    user_id: i64,
    created_at: DateTime<Utc>,
    owner_username: String,
    owner_avatar_url: String,
}

impl FeedRecord {
    fn into_item(self) -> BookPostWithOwner {
        BookPostWithOwner {
            post: BookPost {
                id: BookPostId::from(self.id),
                title: self.title,
                caption: self.caption,
                image_url: self.image_url,
                rating: self.rating,
                user_id: UserId::from(self.user_id),
                created_at: self.created_at,
            },
            user: PostOwner {
                username: self.owner_username,
                avatar_url: self.owner_avatar_url,
            },
        }
    }
}

const POST_COLUMNS: &str = "id, title, caption, image_url, rating, user_id, created_at";

#[async_trait]
impl BookPostRepository for SqlBookPostRepository {
    async fn insert(&self, new_post: NewBookPost) -> Result<BookPost, RepositoryError> {
        let record = query_as::<_, BookPostRecord>(
            r"INSERT INTO book_posts (title, caption, image_url, rating, user_id, created_at)
              VALUES (?, ?, ?, ?, ?, ?)
              RETURNING id, title, caption, image_url, rating, user_id, created_at",
        )
        .bind(&new_post.title)
        .bind(&new_post.caption)
        .bind(&new_post.image_url)
        .bind(new_post.rating)
        .bind(i64::from(new_post.user_id))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(Self::into_post(record))
    }

    async fn get(&self, id: BookPostId) -> Result<BookPost, RepositoryError> {
        let record = query_as::<_, BookPostRecord>(&format!(
            "SELECT {POST_COLUMNS} FROM book_posts WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_post(record))
    }

    async fn list(&self, request: FeedRequest) -> Result<Page<BookPostWithOwner>, RepositoryError> {
        let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM book_posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        // id DESC tie-breaks equal timestamps so page boundaries are stable
        let records = query_as::<_, FeedRecord>(
            r"SELECT b.id, b.title, b.caption, b.image_url, b.rating, b.user_id, b.created_at,
                     u.username AS owner_username, u.avatar_url AS owner_avatar_url
              FROM book_posts b
              JOIN users u ON u.id = b.user_id
              ORDER BY b.created_at DESC, b.id DESC
              LIMIT ? OFFSET ?",
        )
        .bind(i64::from(request.limit()))
        .bind(i64::from(request.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        let items = records.into_iter().map(FeedRecord::into_item).collect();

        Ok(Page::new(items, request, total as u64))
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<BookPost>, RepositoryError> {
        let records = query_as::<_, BookPostRecord>(&format!(
            "SELECT {POST_COLUMNS} FROM book_posts
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(i64::from(user_id))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(records.into_iter().map(Self::into_post).collect())
    }

    async fn delete(&self, id: BookPostId) -> Result<bool, RepositoryError> {
        let result = query("DELETE FROM book_posts WHERE id = ?")
            .bind(i64::from(id))
            .execute(&self.pool)
            .await
            .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
