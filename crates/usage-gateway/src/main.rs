//! usage-tracking: accounting service for authorization callbacks.
//!
//! - `POST /track`  : count one successful request by (user, groups, path)
//! - `GET /healthz` : liveness
//! - `GET /metrics` : Prometheus exposition
//!
//! Env: `PORT` (8080), `LOG_LEVEL` (info), `PPROF` (false).

use std::process::ExitCode;

use usage_gateway::{app_state, config, obs, router, server::Server};

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            obs::logging::init_tracing(config::LogLevel::default());
            tracing::error!(err = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };

    obs::logging::init_tracing(cfg.log_level);
    for (key, value) in &cfg.ignored {
        tracing::warn!(key = %key, value = %value, "unrecognised setting, using default");
    }
    if cfg.pprof {
        tracing::info!("pprof endpoints enabled at /debug/pprof");
    }

    let listen = cfg.listen_addr();
    let level = cfg.log_level;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state.clone());

    let server = match Server::bind(listen, app, state.cfg()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(err = %e, "listen failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(addr = %listen, level = level.as_str(), "usage-tracking listening");
    let outcome = server.run(shutdown_signal()).await;
    tracing::info!(outcome = ?outcome, "stopped");

    ExitCode::SUCCESS
}

/// Interrupt (Ctrl+C / SIGINT) only; no other signal is handled.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(err = %e, "failed to install interrupt handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
