use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{NewUser, User};
use crate::infrastructure::database::DatabasePool;

#[derive(Clone)]
pub struct SqlUserRepository {
    pool: DatabasePool,
}

impl SqlUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    fn into_user(record: UserRecord) -> User {
        User {
            id: UserId::from(record.id),
            username: record.username,
            email: record.email,
            password_hash: record.password_hash,
            avatar_url: record.avatar_url,
            created_at: record.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRecord {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    avatar_url: String,
    created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar_url, created_at";

#[async_trait]
impl UserRepository for SqlUserRepository {
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(
            r"INSERT INTO users (username, email, password_hash, avatar_url, created_at)
              VALUES (?, ?, ?, ?, ?)
              RETURNING id, username, email, password_hash, avatar_url, created_at",
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            // The unique indexes are the authority for duplicate detection;
            // the violated column decides which error kind surfaces.
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                if db_err.message().contains("users.email") {
                    return RepositoryError::DuplicateEmail;
                }
                return RepositoryError::DuplicateUsername;
            }
            RepositoryError::unexpected(err.to_string())
        })?;

        Ok(Self::into_user(record))
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let record = query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Self::into_user(record))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let record = query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(record.map(Self::into_user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let record = query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| RepositoryError::unexpected(err.to_string()))?;

        Ok(record.map(Self::into_user))
    }
}
