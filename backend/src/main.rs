//! Backend entry-point: loads settings, prepares the record store and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cms_backend::inbound::http::health::HealthState;
use cms_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::settings::ServerSettings;
use server::{ServerConfig, create_server};

async fn connect(settings: &ServerSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max) = settings.db_max_connections {
        pool_config = pool_config.with_max_size(max);
    }
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServerSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let mut config = ServerConfig::from_settings(&settings);
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect(&settings, url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server terminated")?;
    health_state.mark_unhealthy();
    info!("server stopped");
    Ok(())
}
