use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::users::User;

/// Extractor carrying the authenticated user through request handlers.
/// Resolves `Authorization: Bearer <token>` to a user; any missing, invalid,
/// or expired token is rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::not_authorized("No authentication token, access denied")
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::not_authorized("No authentication token, access denied")
        })?;

        let user_id = state
            .token_signer
            .verify(token)
            .map_err(|_| AppError::not_authorized("Token is not valid"))?;

        let user = state.user_repo.get(user_id).await.map_err(|err| {
            warn!(error = %err, %user_id, "user lookup failed for valid token");
            AppError::not_authorized("Token is not valid")
        })?;

        Span::current().record("user.id", tracing::field::display(&user.id));
        Ok(Self(user))
    }
}
