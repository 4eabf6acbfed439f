pub mod books;
pub mod errors;
pub mod feed;
pub mod ids;
pub mod repositories;
pub mod users;

// Re-exports
pub use errors::RepositoryError;
