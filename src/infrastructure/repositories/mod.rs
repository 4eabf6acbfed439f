pub mod books;
pub mod users;

pub use books::SqlBookPostRepository;
pub use users::SqlUserRepository;
