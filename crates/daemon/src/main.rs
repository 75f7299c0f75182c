// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `andond`: the andon call-board daemon.
//!
//! Recovers the board from its snapshot and log, then serves the HTTP
//! control surface and push channel until SIGINT/SIGTERM.

mod config;
mod env;
mod lifecycle;
mod listener;

#[cfg(test)]
mod test_helpers;

use std::process::ExitCode;
use std::sync::Arc;

use andon_adapters::{CmmsRouter, EmptyTelemetry};
use andon_core::SystemClock;
use andon_engine::DeskDeps;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::Config;
use crate::lifecycle::{spawn_checkpoint_loop, startup, LifecycleError, Paths};
use crate::listener::{router, ListenCtx};

#[tokio::main]
async fn main() -> ExitCode {
    let paths = match Paths::load() {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("andond: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = init_logging(&paths);

    match run(paths).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "daemon failed");
            eprintln!("andond: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Daily rolling file under the state directory, plus stderr on request.
fn init_logging(paths: &Paths) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&paths.log_dir, "andond.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer).with_filter(filter());
    let stderr_layer = env::log_to_stderr()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_filter(filter()));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
    guard
}

async fn run(paths: Paths) -> Result<(), LifecycleError> {
    let config_path = env::config_path().unwrap_or_else(|| paths.config_path.clone());
    let config = Config::load(&config_path)?.with_env();
    config.validate()?;
    info!(config = %config_path.display(), bind = %config.server.bind, "starting andond {}", env::VERSION);

    let cmms = config.cmms_router()?;
    let notifier = config.notify_router()?;
    info!(cmms = matches!(cmms, CmmsRouter::Fiix(_)), notify = !notifier.is_empty(), "adapters configured");
    let daemon = startup(&paths, config.catalog()?, DeskDeps { cmms, notifier }, SystemClock)?;

    let shutdown = CancellationToken::new();
    let checkpoints = spawn_checkpoint_loop(
        daemon.desk.clone(),
        daemon.checkpointer.clone(),
        env::checkpoint_interval(),
        shutdown.child_token(),
    );

    let listener = match TcpListener::bind(&config.server.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            let err = LifecycleError::BindFailed(config.server.bind.clone(), e);
            shutdown.cancel();
            let _ = checkpoints.await;
            daemon.shutdown(env::drain_timeout()).await;
            return Err(err);
        }
    };

    let ctx = Arc::new(ListenCtx {
        desk: daemon.desk.clone(),
        telemetry: Arc::new(EmptyTelemetry),
        start_time: daemon.start_time,
        shutdown: shutdown.clone(),
    });
    info!(addr = %config.server.bind, "listening");

    let served = axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await;
    if let Err(e) = &served {
        error!(error = %e, "server stopped with error");
    }

    shutdown.cancel();
    let _ = checkpoints.await;
    daemon.shutdown(env::drain_timeout()).await;
    served?;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM, cancelling `shutdown` so push
/// connections close alongside the HTTP server.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
        () = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
