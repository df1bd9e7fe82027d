//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the directory exists, creating it if needed.
pub async fn ensure_dir(dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(dir).await.is_err() {
        info!(%dir, "creating missing directory");
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    Ok(())
}

/// Warn about environment variables that are expected in production but missing.
pub fn warn_missing_env(keys: &[&str]) {
    for key in keys {
        if std::env::var(key).map(|v| v.trim().is_empty()).unwrap_or(true) {
            warn!(%key, "environment variable not set; relying on config file");
        }
    }
}
