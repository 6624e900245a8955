//! # tallyd — tally daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Pick the state backend: Home Assistant helpers or local `SQLite`
//! - Construct the engine, injecting the store via the port trait
//! - Spawn the sensor poller when Home Assistant is configured
//! - Build the axum router, bind to a TCP port, and serve
//! - Handle shutdown on SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tally_adapter_homeassistant::{HaClient, HaHelperStore, HaPoller};
use tally_adapter_http_axum::state::AppState;
use tally_adapter_storage_sqlite_sqlx::SqliteCellStore;
use tally_app::engine::TallyEngine;
use tally_app::event_bus::InProcessEventBus;
use tally_app::ports::StateStore;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let classifier = config.device.classifier();
    let event_bus = Arc::new(InProcessEventBus::new(256));

    match &config.homeassistant {
        Some(ha) => {
            let client = HaClient::new(ha)?;
            let store = HaHelperStore::new(client.clone(), ha.bindings.clone());
            let engine = Arc::new(TallyEngine::new(
                store.clone(),
                classifier,
                Arc::clone(&event_bus),
            ));
            tracing::info!(base_url = %ha.base_url, "using home assistant helpers as state backend");

            let poller = HaPoller::new(client, Arc::clone(&engine), ha.clone());
            tokio::spawn(poller.run());

            serve(AppState::new(engine, store, event_bus), &config.bind_addr()).await
        }
        None => {
            let db = tally_adapter_storage_sqlite_sqlx::Config {
                database_url: config.database.url.clone(),
            }
            .build()
            .await?;
            let store = SqliteCellStore::new(db.pool().clone());
            let engine = Arc::new(TallyEngine::new(
                store.clone(),
                classifier,
                Arc::clone(&event_bus),
            ));
            tracing::info!(url = %config.database.url, "using sqlite as state backend");

            serve(AppState::new(engine, store, event_bus), &config.bind_addr()).await
        }
    }
}

async fn serve<S>(state: AppState<S>, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>>
where
    S: StateStore + Clone + Send + Sync + 'static,
{
    let app = tally_adapter_http_axum::build(state);

    tracing::info!(%bind_addr, "tallyd listening");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("unable to listen for the interrupt signal");
    }
}
