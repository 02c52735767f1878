//! Server lifecycle: `Starting -> Serving -> Draining -> Stopped`.
//!
//! Connections are accepted here and served by hyper's HTTP/1 builder, which
//! enforces the header-read timeout. Once the shutdown future resolves the
//! listener is dropped and in-flight requests get `drain_grace` to finish;
//! connections still open after that are aborted.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use usage_core::error::{Result, UsageError};

use crate::config::UsageConfig;

/// Pause after a failed `accept` (e.g. fd exhaustion) before retrying.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Serving,
    Draining,
    Stopped,
}

/// How the drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every in-flight request finished within the grace period.
    Completed,
    /// The grace period elapsed and the remaining connections were aborted.
    Forced,
}

pub struct Server {
    listener: TcpListener,
    app: Router,
    header_read_timeout: Duration,
    grace: Duration,
    phase: watch::Sender<Phase>,
}

impl Server {
    /// Bind the listening socket. Failure here is fatal to startup.
    pub async fn bind(addr: SocketAddr, app: Router, cfg: &UsageConfig) -> Result<Self> {
        let (phase, _) = watch::channel(Phase::Starting);
        let listener = TcpListener::bind(addr).await.map_err(|source| UsageError::Bind {
            addr: addr.to_string(),
            source,
        })?;

        Ok(Self {
            listener,
            app,
            header_read_timeout: cfg.header_read_timeout,
            grace: cfg.drain_grace,
            phase,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| UsageError::Internal(format!("local_addr: {e}")))
    }

    /// Subscribe to phase transitions.
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Serve until `shutdown` resolves, then drain.
    pub async fn run<F>(self, shutdown: F) -> DrainOutcome
    where
        F: Future<Output = ()> + Send,
    {
        let Server {
            listener,
            app,
            header_read_timeout,
            grace,
            phase,
        } = self;

        let mut http = http1::Builder::new();
        http.timer(TokioTimer::new())
            .header_read_timeout(header_read_timeout);

        let graceful = GracefulShutdown::new();
        let mut conns = JoinSet::new();
        transition(&phase, Phase::Serving);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let svc = TowerToHyperService::new(app.clone());
                        let conn = graceful.watch(http.serve_connection(TokioIo::new(stream), svc));
                        conns.spawn(async move {
                            if let Err(e) = conn.await {
                                tracing::debug!(peer = %peer, err = %e, "connection closed with error");
                            }
                        });
                    }
                    // A listener failure is an operational event, never a crash.
                    Err(e) => {
                        tracing::error!(err = %e, "accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                Some(_) = conns.join_next(), if !conns.is_empty() => {}
            }
        }

        drop(listener);
        transition(&phase, Phase::Draining);

        let drained = tokio::time::timeout(grace, async {
            graceful.shutdown().await;
            while conns.join_next().await.is_some() {}
        })
        .await;

        let outcome = match drained {
            Ok(()) => DrainOutcome::Completed,
            Err(_) => {
                conns.abort_all();
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    open = conns.len(),
                    "drain grace elapsed, aborting in-flight requests"
                );
                DrainOutcome::Forced
            }
        };

        transition(&phase, Phase::Stopped);
        outcome
    }
}

fn transition(phase: &watch::Sender<Phase>, next: Phase) {
    phase.send_replace(next);
    tracing::info!(phase = ?next, "lifecycle transition");
}
