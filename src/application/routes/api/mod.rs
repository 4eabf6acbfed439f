pub(crate) mod auth;
pub(crate) mod books;

use axum::routing::{delete, get, post};

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/user", get(books::list_my_books))
        .route("/books/{id}", delete(books::delete_book))
}
