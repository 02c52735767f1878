//! Labeled request counter for the tracking route.
//!
//! Counts live in a `DashMap` keyed by `LabelKey`, one `AtomicU64` per series.
//! Increments on different keys land on different shards and never share a
//! lock; increments on the same key only take a shard read lock once the
//! series exists. Entries are never removed or reset.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use usage_core::LabelKey;

pub const LLM_REQUESTS_TOTAL: &str = "llm_requests_total";
const LLM_REQUESTS_HELP: &str = "Successful LLM requests labelled by user, group and path.";

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Default)]
pub struct CounterRegistry {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by 1, creating the series at 1 if absent.
    pub fn increment(&self, key: LabelKey) {
        if let Some(counter) = self.map.get(&key) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count, `None` if the key was never recorded.
    pub fn get(&self, key: &LabelKey) -> Option<u64> {
        self.map.get(key).map(|c| c.load(Ordering::Relaxed))
    }

    /// Number of recorded series.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Render in Prometheus text exposition format.
    ///
    /// Each value is a single atomic load, so no line shows a torn count.
    /// Series are sorted by key; the family is omitted while empty.
    pub fn render(&self) -> String {
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        if rows.is_empty() {
            return String::new();
        }
        rows.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        let _ = writeln!(out, "# HELP {} {}", LLM_REQUESTS_TOTAL, LLM_REQUESTS_HELP);
        let _ = writeln!(out, "# TYPE {} counter", LLM_REQUESTS_TOTAL);
        for (key, val) in rows {
            let _ = writeln!(
                out,
                "{}{{user=\"{}\",groups=\"{}\",path=\"{}\"}} {}",
                LLM_REQUESTS_TOTAL,
                escape_label(key.user()),
                escape_label(key.groups()),
                escape_label(key.path()),
                val
            );
        }
        out
    }
}
