use std::{net::SocketAddr, sync::Arc};

use migration::{Migrator, MigratorTrait};
use tracing::{info, warn};

use configs::{AppConfig, StorageBackend};
use service::identity::repo::seaorm::SeaOrmAccountRepository;
use service::identity::{TokenConfig, TokenIdentityProvider};
use service::repo::seaorm::SeaOrmStore;
use service::storage::ObjectBlobStore;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{Backends, ServerSettings, ServerState};

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {e}", cfg.server.host, cfg.server.port)))
}

/// Wire stores, identity and blob storage from `cfg` into handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_with_config(&cfg.database).await.map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
        info!("migrations_applied");
    }

    if cfg.storage.backend == StorageBackend::Local {
        common::env::ensure_dir(&cfg.storage.local_root).await?;
    }
    let blobs = ObjectBlobStore::from_config(&cfg.storage).map_err(|e| StartupError::Storage(e.to_string()))?;

    let identity = TokenIdentityProvider::new(
        Arc::new(SeaOrmAccountRepository { db: db.clone() }),
        TokenConfig::from_identity(&cfg.identity),
    );
    let store = Arc::new(SeaOrmStore::new(db));

    let backends = Backends {
        bikes: store.clone(),
        sales: store.clone(),
        profiles: store,
        identity: Arc::new(identity),
        blobs: Arc::new(blobs),
    };
    let settings = ServerSettings {
        enable_debug_routes: cfg.server.enable_debug_routes,
        max_upload_bytes: cfg.storage.max_upload_bytes,
        secure_cookies: false,
    };
    Ok(ServerState::new(backends, settings))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler failed; shutdown only on process exit");
        std::future::pending::<()>().await;
    }
    info!("shutdown_signal_received");
}

/// Serve with an already validated config until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> Result<(), StartupError> {
    if cfg.server.enable_debug_routes {
        warn!("debug routes enabled; do not expose this instance publicly");
    }
    let state = build_state(&cfg).await?;

    if let Some(admin) = &cfg.identity.bootstrap_admin {
        let profile = state.users.ensure_admin(admin).await.map_err(|e| StartupError::Any(anyhow::anyhow!("bootstrap admin: {e}")))?;
        info!(uid = %profile.id, email = %profile.email, "bootstrap_admin_ready");
    }

    let app = routes::build_router(state, routes::build_cors(&cfg.server.cors_origins));
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| StartupError::Any(e.into()))?;
    info!(%addr, storage = ?cfg.storage.backend, "server_listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server_stopped");
    Ok(())
}
