//! Environment/runtime helpers
//!
//! Sanity checks run once at startup.

use tracing::warn;

/// Ensure the directory holding a SQLite database file exists.
///
/// Non-SQLite URLs and in-memory databases are left alone.
pub async fn ensure_sqlite_dir(db_url: &str) -> anyhow::Result<()> {
    let Some(path) = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    if path.contains("mode=memory") {
        return Ok(());
    }
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if parent.as_os_str().is_empty() {
            return Ok(());
        }
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    }
    Ok(())
}

/// Warn when the signing secret is the development fallback.
pub fn warn_on_dev_secret(secret: &str) {
    if secret == DEV_JWT_SECRET {
        warn!("JWT_SECRET not set; using the development secret. Set JWT_SECRET in production.");
    }
}

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";
