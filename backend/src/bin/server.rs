//! School HTTP Server Binary
//!
//! Loads configuration, seeds the built-in admin, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin school-server
//!
//! # Override the bind address and admin password
//! HOST=127.0.0.1 PORT=9000 SCHOOL_ADMIN_PASSWORD=s3cret-pass cargo run --bin school-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: Storage backend (default: local)
//! - `SCHOOL_ADMIN_PASSWORD`: Password of the seeded admin
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use school_backend::config::AppConfig;
use school_backend::db::RepositoryFactory;
use school_backend::http::{create_router, AppState};
use school_backend::services::users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting school HTTP server");

    let config = AppConfig::load()?;
    let repository = RepositoryFactory::create(config.repository_type()?)?;
    info!("Repository initialized ({})", config.repository.repo_type);

    if users::seed_admin(repository.as_ref(), &config.admin)
        .await?
        .is_some()
    {
        info!("Built-in admin created");
    }

    let state = AppState::new(repository).with_grading(config.grading);
    let app = create_router(state);

    let addr = config.bind_address();
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
