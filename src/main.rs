use std::net::SocketAddr;

use anyhow::Result;
use bookfeed::application::{ServerConfig, serve};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bookfeed", about = "Book-recommendation REST backend")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BOOKFEED_BIND_ADDRESS", default_value = "0.0.0.0:3000")]
    bind_address: SocketAddr,

    /// SQLite database URL
    #[arg(long, env = "BOOKFEED_DATABASE_URL", default_value = "sqlite://bookfeed.db")]
    database_url: String,

    /// Secret used to sign bearer tokens. Rotating it invalidates every
    /// outstanding token.
    #[arg(long, env = "BOOKFEED_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// Base URL of the image-hosting provider
    #[arg(long, env = "BOOKFEED_IMAGE_PROVIDER_URL")]
    image_provider_url: String,

    /// API key for the image-hosting provider
    #[arg(long, env = "BOOKFEED_IMAGE_PROVIDER_KEY", default_value = "", hide_env_values = true)]
    image_provider_key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    let config = ServerConfig {
        bind_address: cli.bind_address,
        database_url: cli.database_url,
        token_secret: cli.token_secret,
        image_provider_url: cli.image_provider_url,
        image_provider_key: cli.image_provider_key,
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
