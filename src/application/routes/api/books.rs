use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::ApiError;
use crate::application::services::NewBookSubmission;
use crate::application::state::AppState;
use crate::domain::books::{BookPost, BookPostWithOwner};
use crate::domain::feed::{DEFAULT_PAGE_SIZE, FeedRequest};
use crate::domain::ids::BookPostId;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FeedQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

impl FeedQuery {
    fn into_request(self) -> FeedRequest {
        FeedRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedResponse {
    books: Vec<BookPostWithOwner>,
    current_page: u32,
    total_books: u64,
    total_pages: u32,
}

#[derive(Serialize)]
pub(crate) struct OwnedBooksResponse {
    books: Vec<BookPost>,
}

#[derive(Serialize)]
pub(crate) struct MessageResponse {
    message: String,
}

#[tracing::instrument(skip(state, auth_user, payload))]
pub(crate) async fn create_book(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<NewBookSubmission>,
) -> Result<(StatusCode, Json<BookPost>), ApiError> {
    let post = state.book_service.create(auth_user.0.id, payload).await?;

    info!(post_id = %post.id, title = %post.title, "book post created");

    Ok((StatusCode::CREATED, Json(post)))
}

#[tracing::instrument(skip(state, _auth_user))]
pub(crate) async fn list_books(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let page = state.book_service.feed(query.into_request()).await?;

    Ok(Json(FeedResponse {
        current_page: page.page,
        total_books: page.total,
        total_pages: page.total_pages(),
        books: page.items,
    }))
}

/// Posts owned by the authenticated caller, newest first.
#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_my_books(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<OwnedBooksResponse>, ApiError> {
    let books = state.book_service.posts_for(auth_user.0.id).await?;
    Ok(Json(OwnedBooksResponse { books }))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn delete_book(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<BookPostId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.book_service.delete(auth_user.0.id, id).await?;

    info!(%id, "book post deleted");

    Ok(Json(MessageResponse {
        message: "Book deleted successfully".to_string(),
    }))
}
