//! Backend entry-point: loads settings, prepares the database, and serves the
//! REST API.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mahjong_ledger::inbound::http::health::HealthState;
use mahjong_ledger::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;

    let key = load_session_key(
        &settings.session_key_file(),
        settings.session_allow_ephemeral,
    )?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(key, settings.session_cookie_secure, bind_addr);
    if let Some(database_url) = settings.database_url.clone() {
        let pool = connect(database_url, settings.db_max_connections()).await?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics()?);

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting mahjong ledger");
    create_server(health_state, config)?.await
}

/// Apply pending migrations and open the connection pool.
async fn connect(database_url: String, max_connections: u32) -> io::Result<DbPool> {
    let migration_url = database_url.clone();
    let applied = web::block(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
        .map_err(io::Error::other)?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url).with_max_size(max_connections))
        .await
        .map_err(io::Error::other)
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<Option<PrometheusMetrics>> {
    PrometheusMetricsBuilder::new("mahjong_ledger")
        .endpoint("/metrics")
        .build()
        .map(Some)
        .map_err(|e| io::Error::other(format!("configure Prometheus metrics: {e}")))
}
