//! Server entry point: loads configuration, prepares the database and serves
//! the role/user API plus the health routes.
//!
//! Run from repo root: `cargo run -p admin-server`

use admin_backend::{
    api_routes,
    common_routes_with_ready,
    ensure_database_exists,
    ensure_tables,
    AppConfig,
    AppState,
    JwtService,
};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("admin_backend=info,admin_server=info")),
        )
        .init();

    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool, &config.schema).await?;

    let state = AppState::with_pool(pool.clone(), JwtService::new(&config.jwt), &config.schema);
    let app = Router::new()
        .merge(common_routes_with_ready(pool))
        .merge(api_routes(state))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
