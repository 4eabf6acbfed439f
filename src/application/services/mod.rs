mod auth;
mod books;

pub use auth::{AuthService, AuthSuccess};
pub use books::{BookService, NewBookSubmission};
