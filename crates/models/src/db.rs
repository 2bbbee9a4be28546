use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

/// Open a pool sized from `cfg`.
///
/// An in-memory SQLite database only exists inside a single connection, so
/// the pool is pinned to exactly one connection in that case.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.sqlx_logging(cfg.sqlx_logging)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs));

    if is_memory_sqlite(&cfg.url) {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }

    let db = Database::connect(opt).await?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

fn is_memory_sqlite(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("sqlite:") && (lower.contains(":memory:") || lower.contains("mode=memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_memory_urls() {
        assert!(is_memory_sqlite("sqlite::memory:"));
        assert!(is_memory_sqlite("sqlite:file:pawbook?mode=memory&cache=shared"));
        assert!(!is_memory_sqlite("sqlite://data/pawbook.db?mode=rwc"));
        assert!(!is_memory_sqlite("postgres://localhost/pawbook"));
    }

    #[tokio::test]
    async fn memory_database_answers_ping() -> anyhow::Result<()> {
        let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
        let db = connect_with_config(&cfg).await?;
        db.ping().await?;
        Ok(())
    }
}
