use std::net::TcpListener;

use actix_web::web;
use anyhow::Context;
use once_cell::sync::Lazy;
use portfolio_contact_backend::{
    background_task::start_rate_limit_sweep,
    constants::START_TIME,
    graceful_shutdown::shutdown_signal,
    settings::AppConfig,
    startup, AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    Lazy::force(&START_TIME);

    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::fmt().init();
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let app_state = web::Data::new(AppState::new(&config));

    let server_addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&server_addr)
        .with_context(|| format!("Failed to bind {}", server_addr))?;

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );
    tracing::info!("📧 Ready to receive contact form submissions");

    let sweep = tokio::spawn(start_rate_limit_sweep(
        app_state.rate_limiter.clone(),
        config.rate_limit_sweep_interval,
    ));

    let server = startup::run(listener, app_state, &config)?;
    let handle = server.handle();

    tokio::select! {
        res = server => res.context("HTTP server failed")?,
        _ = shutdown_signal() => handle.stop(true).await,
    }

    sweep.abort();
    Ok(())
}
