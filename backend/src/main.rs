//! Backend entry-point: loads settings, wires persistence, and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use std::path::Path;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use formly::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use formly::outbound::security::generate_secret;
use server::{ServerConfig, ServerSettings, build_health_state, create_server};

/// Read the session signing secret, falling back to a random one in
/// development or when explicitly allowed.
fn load_secret(path: &Path, allow_ephemeral: bool) -> std::io::Result<Zeroizing<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path.display(), error = %e, "using temporary session secret (dev only)");
                Ok(generate_secret())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session secret at {}: {e}",
                    path.display()
                )))
            }
        }
    }
}

async fn connect(settings: &ServerSettings, database_url: &str) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max) = settings.db_max_connections {
        pool_config = pool_config.with_max_size(max);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
    info!("database pool ready");
    Ok(pool)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let secret = load_secret(&settings.jwt_secret_file(), settings.allow_ephemeral_secret)?;
    let config = ServerConfig::new(secret, settings.cookie_secure(), settings.bind_addr()?);
    let config = match settings.database_url.as_deref() {
        Some(url) => config.with_db_pool(connect(&settings, url).await?),
        None => {
            warn!("no database configured; data is kept in memory");
            config
        }
    };

    let health_state = build_health_state(&config);
    info!(addr = %config.bind_addr(), "starting server");
    create_server(health_state, config)?.await
}
