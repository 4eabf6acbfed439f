use std::sync::Arc;

use crate::application::services::{AuthService, BookService};
use crate::domain::repositories::{BookPostRepository, UserRepository};
use crate::infrastructure::database::Database;
use crate::infrastructure::images::ImageStore;
use crate::infrastructure::repositories::{SqlBookPostRepository, SqlUserRepository};
use crate::infrastructure::token::TokenSigner;

/// Everything that varies between production and test environments: the
/// signing secret and the image-hosting provider. Repos and services are
/// created from the database pool.
pub struct AppStateConfig {
    pub token_secret: String,
    pub image_provider_url: String,
    pub image_provider_key: String,
}

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub book_repo: Arc<dyn BookPostRepository>,
    pub token_signer: TokenSigner,
    pub auth_service: AuthService,
    pub book_service: BookService,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let pool = database.clone_pool();

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(pool.clone()));
        let book_repo: Arc<dyn BookPostRepository> = Arc::new(SqlBookPostRepository::new(pool));

        let token_signer = TokenSigner::new(config.token_secret);

        #[allow(clippy::expect_used)]
        let http_client = reqwest::ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        let image_store = ImageStore::new(
            http_client,
            config.image_provider_url,
            config.image_provider_key,
        );

        let auth_service = AuthService::new(Arc::clone(&user_repo), token_signer.clone());
        let book_service = BookService::new(Arc::clone(&book_repo), image_store);

        Self {
            user_repo,
            book_repo,
            token_signer,
            auth_service,
            book_service,
        }
    }
}
