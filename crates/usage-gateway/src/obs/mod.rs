//! Observability: the request counter registry and logging bootstrap.
//!
//! The registry is dependency-light (DashMap + atomics) and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod logging;
pub mod metrics;
