//! # ecohubd: ecohub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (`ecohub.toml`, env vars)
//! - Initialize logging, the `SQLite` connection pool and run migrations
//! - Construct repository, clock, actuator and predictor implementations
//! - Seed the device registry on first start
//! - Spawn the control loop and serve both request surfaces
//! - Handle graceful shutdown (SIGTERM/SIGINT): stop accepting requests, let
//!   the in-flight tick finish, then close the pool
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ecohub_adapter_http_axum::state::AppState;
use ecohub_adapter_predictor_process::ProcessPredictor;
use ecohub_adapter_storage_sqlite_sqlx::{SqliteDeviceRepository, SqliteEnergyRecordRepository};
use ecohub_adapter_virtual::{LocalClock, VirtualActuator};
use ecohub_app::control_loop::{ControlLoop, ControlLoopConfig};
use ecohub_app::hub::Hub;
use ecohub_app::ports::Adapters;
use ecohub_domain::threshold::Threshold;

use crate::config::Config;

/// The production adapter set.
enum Live {}

impl Adapters for Live {
    type Devices = SqliteDeviceRepository;
    type Records = SqliteEnergyRecordRepository;
    type Clock = LocalClock;
    type Actuator = VirtualActuator;
    type Predictor = ProcessPredictor;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = ecohub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("opening database")?;
    let pool = db.pool().clone();

    // Collaborators
    let predictor = config.predictor.program.clone().map(|program| {
        ProcessPredictor::new(ecohub_adapter_predictor_process::Config {
            program,
            args: config.predictor.args.clone(),
            timeout: config.predictor_timeout(),
        })
    });
    if predictor.is_none() {
        tracing::info!("no predictor program configured, using the local formula");
    }
    let threshold = Threshold::new(config.control.threshold).context("initial threshold")?;

    let hub: Arc<Hub<Live>> = Arc::new(Hub::new(
        SqliteDeviceRepository::new(pool.clone()),
        SqliteEnergyRecordRepository::new(pool),
        LocalClock,
        VirtualActuator::new(config.actuator.reachable),
        predictor,
        threshold,
    ));

    hub.devices
        .seed_defaults()
        .await
        .context("seeding devices")?;

    // Control loop
    let cancel = CancellationToken::new();
    let control_loop = ControlLoop::new(
        Arc::clone(&hub),
        ControlLoopConfig {
            interval: config.control_interval(),
            jitter: config.control.jitter,
            seed: None,
        },
    );
    let loop_cancel = cancel.clone();
    let loop_handle = tokio::spawn(async move { control_loop.run(loop_cancel).await });

    // HTTP
    let app = ecohub_adapter_http_axum::router::build(AppState::new(hub));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "ecohubd listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cancel.cancel();
    if let Err(err) = loop_handle.await {
        tracing::error!(error = %err, "control loop task failed");
    }
    db.close().await;
    tracing::info!("shutdown complete");

    served.context("serving http")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
