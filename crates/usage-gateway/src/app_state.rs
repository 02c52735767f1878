//! Shared application state for the usage-tracking service.
//!
//! The registry is constructed here, once, and handed to every handler by
//! shared ownership. Tests build an isolated state per case.

use std::sync::Arc;
use std::time::Instant;

use crate::config::UsageConfig;
use crate::obs::metrics::CounterRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<CounterRegistry>,
}

struct AppStateInner {
    cfg: UsageConfig,
    started_at: Instant,
}

impl AppState {
    pub fn new(cfg: UsageConfig) -> Self {
        Self::with_registry(cfg, Arc::new(CounterRegistry::new()))
    }

    pub fn with_registry(cfg: UsageConfig, registry: Arc<CounterRegistry>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                started_at: Instant::now(),
            }),
            registry,
        }
    }

    pub fn cfg(&self) -> &UsageConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &CounterRegistry {
        &self.registry
    }

    pub fn started_at(&self) -> Instant {
        self.inner.started_at
    }
}
