use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::errors::ApiError;
use crate::application::services::AuthSuccess;
use crate::application::state::AppState;
use crate::domain::users::PublicUser;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub(crate) struct AuthResponse {
    token: String,
    user: PublicUser,
    message: String,
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let AuthSuccess { token, user } = state
        .auth_service
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user,
            message: "User registered successfully".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state, payload))]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let AuthSuccess { token, user } = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        token,
        user,
        message: "User logged in successfully".to_string(),
    }))
}
