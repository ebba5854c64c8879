//! Course feedback entry-point: loads settings, picks a store, and serves the API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use course_feedback::inbound::http::health::HealthState;
use course_feedback::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{AppSettings, AvatarStorage, ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let config = build_config(&settings).await?;

    #[cfg(feature = "example-data")]
    seed_example_data(&config).await?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)
        .wrap_err("failed to start HTTP server")?
        .await
        .wrap_err("HTTP server terminated with an error")
}

async fn build_config(settings: &AppSettings) -> Result<ServerConfig> {
    let key = settings.session_key()?;
    let avatars = AvatarStorage::new(settings.avatar_dir(), settings.avatar_base_url());
    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr()?,
        avatars,
    )
    .with_limits(settings.http_limits()?)
    .with_code_policy(settings.course_code_policy()?)
    .with_max_analytics_days(settings.max_analytics_days());

    let config = match settings.database_url.as_deref() {
        Some(url) => {
            let applied = run_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build database pool")?;
            config.with_db_pool(pool)
        }
        None => {
            warn!("no database url configured; using the in-process store");
            config
        }
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_metrics()?));

    Ok(config)
}

#[cfg(feature = "example-data")]
async fn seed_example_data(config: &ServerConfig) -> Result<()> {
    use course_feedback::example_data::{ExampleDataSettings, seed_example_data_on_startup};

    // CLI flags belong to the server settings; seeding reads env and file layers only.
    let program = std::ffi::OsString::from("course-feedback");
    let settings = ExampleDataSettings::load_from_iter([program])
        .wrap_err("failed to load example data settings")?;
    seed_example_data_on_startup(&settings, config.repositories(), server::password_hasher())
        .await
        .wrap_err("example data seeding failed")?;
    Ok(())
}
