//! Process introspection under `/debug/pprof`.
//!
//! Mounted by the router only when profiling is enabled.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::app_state::AppState;

const INDEX: &str = "\
/debug/pprof/

cmdline  command line of the running process, NUL separated
runtime  async runtime and process counters (JSON)
";

#[derive(Debug, Serialize)]
pub struct RuntimeSnapshot {
    pub pid: u32,
    pub uptime_secs: u64,
    pub workers: usize,
    pub alive_tasks: usize,
    pub series: usize,
}

/// Add the `/debug/pprof` tree; the index answers with and without a trailing slash.
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/debug/pprof", get(index))
        .route("/debug/pprof/", get(index))
        .route("/debug/pprof/cmdline", get(cmdline))
        .route("/debug/pprof/runtime", get(runtime))
}

async fn index() -> &'static str {
    INDEX
}

async fn cmdline() -> String {
    std::env::args().collect::<Vec<_>>().join("\0")
}

async fn runtime(State(state): State<AppState>) -> Json<RuntimeSnapshot> {
    let metrics = tokio::runtime::Handle::current().metrics();
    Json(RuntimeSnapshot {
        pid: std::process::id(),
        uptime_secs: state.started_at().elapsed().as_secs(),
        workers: metrics.num_workers(),
        alive_tasks: metrics.num_alive_tasks(),
        series: state.registry().len(),
    })
}
