use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::service::AuthConfig;
use service::booking::BookingPolicy;

use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Shared handler state from a validated configuration and an open pool.
pub fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> ServerState {
    ServerState {
        db,
        auth: AuthConfig::from(&cfg.auth),
        booking: BookingPolicy::from(&cfg.booking),
    }
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Connect, migrate, bind and serve until `shutdown` resolves.
pub async fn run<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    common::env::ensure_sqlite_dir(&cfg.database.url).await?;
    common::env::warn_on_dev_secret(&cfg.auth.jwt_secret);

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!(reject_overlaps = cfg.booking.reject_overlaps, "schema up to date");

    let app = build_app(build_state(&cfg, db));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting pawbook server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
