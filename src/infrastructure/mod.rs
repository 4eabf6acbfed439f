pub mod database;
pub mod images;
pub mod password;
pub mod repositories;
pub mod token;
