//! Fetch pipeline: collect from every source → merge → persist, or persist
//! a degraded placeholder when nothing came back.

use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDateTime;
use fc3d_core::{degraded_record, merge};
use fc3d_sources::Orchestrator;
use fc3d_store::SnapshotStore;
use tracing::{info, warn};

/// How a run ended. Persistence failures are not an outcome; they are
/// returned as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one source yielded data and the merged window was written.
    Fresh {
        persisted: usize,
        newest: String,
        sources_ok: usize,
    },
    /// Every source came back empty; a placeholder snapshot was written.
    Degraded { period: String },
}

/// Process exit status when fresh data was persisted.
pub const EXIT_FRESH: u8 = 0;
/// Process exit status when only the placeholder could be written.
pub const EXIT_DEGRADED: u8 = 1;
/// Process exit status for configuration and persistence failures.
pub const EXIT_FATAL: u8 = 2;

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fresh { .. })
    }

    pub fn code(&self) -> u8 {
        if self.is_success() {
            EXIT_FRESH
        } else {
            EXIT_DEGRADED
        }
    }
}

/// Run the pipeline once. `now` stamps the documents and, on the degraded
/// path, determines the placeholder period. A `window` of 0 keeps one record.
pub async fn run(
    orchestrator: &Orchestrator,
    store: &SnapshotStore,
    window: usize,
    now: NaiveDateTime,
) -> anyhow::Result<RunOutcome> {
    let start = Instant::now();
    let window = window.max(1);

    // 1. Every source, in precedence order.
    let collected = orchestrator.collect().await;

    // 2. Merge: first-seen wins, newest first, bounded.
    let merged = merge(&collected.per_source, window);

    // 3. Persist, falling back to a placeholder when nothing survived.
    let outcome = if let Some(newest) = merged.first() {
        let newest = newest.period().to_string();
        store
            .persist(&merged, now)
            .context("persisting merged snapshot")?;
        RunOutcome::Fresh {
            persisted: merged.len(),
            newest,
            sources_ok: collected.succeeded(),
        }
    } else {
        let failed: Vec<String> = collected
            .reports
            .iter()
            .map(|r| format!("{}={}", r.source, r.status.as_str()))
            .collect();
        let reason = if failed.is_empty() {
            "no sources configured".to_string()
        } else {
            format!("all sources failed ({})", failed.join(", "))
        };
        warn!(%reason, "no draw data from any source");

        let placeholder = degraded_record(now, &reason).context("building degraded record")?;
        let period = placeholder.period().to_string();
        store
            .persist(&[placeholder], now)
            .context("persisting degraded snapshot")?;
        RunOutcome::Degraded { period }
    };

    info!(?outcome, elapsed_ms = start.elapsed().as_millis() as u64, "run complete");
    Ok(outcome)
}
