//! Service entry point: loads settings, prepares storage and serves HTTP.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use lostfound::inbound::http::health::HealthState;
use lostfound::inbound::http::session_config::fingerprint::key_fingerprint;
use lostfound::inbound::http::session_config::{BuildMode, session_settings};
use lostfound::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{AppSettings, ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

async fn connect(pool_config: Option<PoolConfig>) -> std::io::Result<Option<DbPool>> {
    let Some(config) = pool_config else {
        return Ok(None);
    };
    run_migrations(config.database_url())
        .await
        .map_err(|err| startup_error("database migrations failed", err))?;
    let pool = DbPool::new(config)
        .await
        .map_err(|err| startup_error("database pool failed", err))?;
    Ok(Some(pool))
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

    let settings =
        AppSettings::load().map_err(|err| startup_error("configuration invalid", err))?;
    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("session configuration invalid", err))?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("configuration invalid", err))?;
    let domain = settings
        .institution_domain()
        .map_err(|err| startup_error("configuration invalid", err))?;
    let mailer = settings
        .mailer()
        .map_err(|err| startup_error("configuration invalid", err))?;
    let login_policy = settings
        .login_policy(BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("configuration invalid", err))?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_institution_domain(domain)
    .with_mailer(mailer)
    .with_login_policy(login_policy);
    if let Some(pool) = connect(settings.pool_config()).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
