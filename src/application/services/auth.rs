use std::sync::Arc;

use tracing::warn;

use crate::application::errors::AppError;
use crate::domain::RepositoryError;
use crate::domain::repositories::UserRepository;
use crate::domain::users::{
    MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH, NewUser, PublicUser, avatar_url_for,
};
use crate::infrastructure::password::{hash_password, verify_password};
use crate::infrastructure::token::TokenSigner;

pub struct AuthSuccess {
    pub token: String,
    pub user: PublicUser,
}

/// Registration and login. Validation runs before any side effect; the
/// repository's uniqueness constraints remain the authority for races.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenSigner,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, AppError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }
        // Character counts, not byte lengths; multibyte names must not
        // slip past the minimum.
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(
                "Password must be at least 6 characters",
            ));
        }
        if username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(AppError::validation(
                "Username must be at least 3 characters",
            ));
        }

        // Pre-checks give the right error kind up front; email is checked
        // first, so it wins when both collide. A racing duplicate still gets
        // caught by the insert below.
        if self.users.find_by_email(email).await.map_err(AppError::from)?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        if self
            .users
            .find_by_username(username)
            .await
            .map_err(AppError::from)?
            .is_some()
        {
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = hash_password(password)
            .map_err(|err| AppError::unexpected(err.to_string()))?;

        let user = self
            .users
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                avatar_url: avatar_url_for(username),
            })
            .await
            .map_err(AppError::from)?;

        let token = self.tokens.issue(user.id);

        Ok(AuthSuccess {
            token,
            user: PublicUser::from(user),
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("All fields are required"));
        }

        // Unknown email and wrong password produce the identical error, so
        // the endpoint never reveals whether an email is registered.
        let user = match self.users.find_by_email(email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AppError::InvalidCredentials),
            Err(RepositoryError::Unexpected(message)) => {
                warn!(error = %message, "user lookup failed during login");
                return Err(AppError::Unexpected(message));
            }
            Err(err) => return Err(AppError::from(err)),
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id);

        Ok(AuthSuccess {
            token,
            user: PublicUser::from(user),
        })
    }
}
