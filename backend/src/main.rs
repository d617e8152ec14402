//! Allocation service entry-point: loads settings, provisions the store and
//! serves the REST API.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use allocations::inbound::http::health::HealthState;
use allocations::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use allocations::settings::AllocationSettings;
use server::{ServerConfig, create_server};

const BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Run embedded migrations, then build the connection pool.
async fn connect_store(settings: &AllocationSettings) -> Result<DbPool> {
    let url = settings
        .connection_url()
        .wrap_err("invalid database configuration")?;

    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to provision allocation schema")?;

    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .wrap_err("failed to build connection pool")?;
    info!(database = settings.database_name(), "allocation store connected");
    Ok(pool)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings =
        AllocationSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;

    let pool = if settings.in_memory {
        warn!("in-memory mode: allocations are lost on restart");
        None
    } else {
        Some(connect_store(&settings).await?)
    };

    let mut config = ServerConfig::new(SocketAddr::from(BIND_ADDR));
    if let Some(pool) = &pool {
        config = config.with_db_pool(pool.clone());
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::default_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("failed to bind server")?;
    info!(addr = ?SocketAddr::from(BIND_ADDR), "allocation service listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    drop(pool);
    info!("allocation service stopped");
    outcome.wrap_err("server terminated with an error")
}

#[cfg(test)]
mod tests;
