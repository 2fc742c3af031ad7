//! Run every adapter once, in order, isolating each failure.

use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use fc3d_core::RawDraw;
use futures::FutureExt;
use tracing::{info, warn};

use crate::{SourceAdapter, SourceError};

/// Default per-adapter budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one adapter invocation. Observability only; the data path
/// sees an empty list for every non-`Ok` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    Empty,
    Failed(String),
    TimedOut,
    Panicked,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timed_out",
            Self::Panicked => "panicked",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: &'static str,
    pub status: FetchStatus,
    pub count: usize,
    pub elapsed: Duration,
}

/// Per-source results in adapter order, plus one report per adapter.
#[derive(Debug, Default)]
pub struct Collected {
    pub per_source: Vec<Vec<RawDraw>>,
    pub reports: Vec<SourceReport>,
}

impl Collected {
    /// Raw items across all sources, before deduplication.
    pub fn total(&self) -> usize {
        self.per_source.iter().map(Vec::len).sum()
    }

    /// Sources that returned at least one item.
    pub fn succeeded(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status == FetchStatus::Ok)
            .count()
    }
}

/// Invokes a fixed, ordered list of adapters.
pub struct Orchestrator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    timeout: Duration,
}

impl Orchestrator {
    /// `adapters` must be in precedence order.
    pub fn new(adapters: Vec<Box<dyn SourceAdapter>>, timeout: Duration) -> Self {
        Self { adapters, timeout }
    }

    /// Call every adapter sequentially. A success never short-circuits the
    /// adapters after it. Errors, timeouts and panics become an empty list
    /// for that source.
    pub async fn collect(&self) -> Collected {
        let mut collected = Collected::default();

        for adapter in &self.adapters {
            let source = adapter.name();
            let start = Instant::now();
            let call = AssertUnwindSafe(adapter.fetch()).catch_unwind();

            let (draws, status) = match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(Ok(draws))) if draws.is_empty() => (draws, FetchStatus::Empty),
                Ok(Ok(Ok(draws))) => (draws, FetchStatus::Ok),
                Ok(Ok(Err(e))) => {
                    warn!(source, error = %e, unavailable = e.is_unavailable(), "source failed");
                    (Vec::new(), FetchStatus::Failed(e.to_string()))
                }
                Ok(Err(_)) => {
                    warn!(source, "source panicked");
                    (Vec::new(), FetchStatus::Panicked)
                }
                Err(_) => {
                    let e = SourceError::Timeout(self.timeout);
                    warn!(source, error = %e, unavailable = e.is_unavailable(), "source timed out");
                    (Vec::new(), FetchStatus::TimedOut)
                }
            };

            let report = SourceReport {
                source,
                count: draws.len(),
                status,
                elapsed: start.elapsed(),
            };
            info!(
                source,
                status = report.status.as_str(),
                count = report.count,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "source finished"
            );

            collected.per_source.push(draws);
            collected.reports.push(report);
        }

        info!(
            sources = self.adapters.len(),
            succeeded = collected.succeeded(),
            items = collected.total(),
            "collection complete"
        );
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Draws(Vec<RawDraw>),
        Fail,
        Panic,
        Hang,
    }

    struct Stub {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl Stub {
        fn boxed(name: &'static str, behaviour: Behaviour) -> (Box<dyn SourceAdapter>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let stub = Stub {
                name,
                behaviour,
                calls: calls.clone(),
            };
            (Box::new(stub), calls)
        }
    }

    #[async_trait]
    impl SourceAdapter for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch(&self) -> Result<Vec<RawDraw>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Draws(d) => Ok(d.clone()),
                Behaviour::Fail => Err(SourceError::Status { status: 503 }),
                Behaviour::Panic => panic!("adapter bug"),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(Vec::new())
                }
            }
        }
    }

    fn raw(p: &str) -> RawDraw {
        RawDraw::new(p, [1, 2, 3], None)
    }

    #[tokio::test]
    async fn every_adapter_runs_even_after_success() {
        let (a, a_calls) = Stub::boxed("a", Behaviour::Draws(vec![raw("2025001")]));
        let (b, b_calls) = Stub::boxed("b", Behaviour::Draws(vec![raw("2025002")]));
        let orch = Orchestrator::new(vec![a, b], DEFAULT_TIMEOUT);

        let collected = orch.collect().await;
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(collected.per_source.len(), 2);
        assert_eq!(collected.per_source[0][0].period, "2025001");
        assert_eq!(collected.per_source[1][0].period, "2025002");
        assert_eq!(collected.succeeded(), 2);
    }

    #[tokio::test]
    async fn failures_are_isolated_and_order_preserved() {
        let (fail, _) = Stub::boxed("fail", Behaviour::Fail);
        let (boom, _) = Stub::boxed("boom", Behaviour::Panic);
        let (hang, _) = Stub::boxed("hang", Behaviour::Hang);
        let (empty, _) = Stub::boxed("empty", Behaviour::Draws(vec![]));
        let (good, _) = Stub::boxed("good", Behaviour::Draws(vec![raw("2025003")]));
        let orch = Orchestrator::new(vec![fail, boom, hang, empty, good], Duration::from_millis(50));

        let collected = orch.collect().await;
        assert_eq!(collected.per_source.len(), 5);
        assert!(collected.per_source[..4].iter().all(Vec::is_empty));
        assert_eq!(collected.per_source[4].len(), 1);
        assert_eq!(collected.total(), 1);

        let statuses: Vec<_> = collected.reports.iter().map(|r| (r.source, r.status.clone())).collect();
        assert_eq!(statuses[0].0, "fail");
        assert!(matches!(statuses[0].1, FetchStatus::Failed(ref m) if m.contains("503")));
        assert_eq!(statuses[1], ("boom", FetchStatus::Panicked));
        assert_eq!(statuses[2], ("hang", FetchStatus::TimedOut));
        assert_eq!(statuses[3], ("empty", FetchStatus::Empty));
        assert_eq!(statuses[4], ("good", FetchStatus::Ok));
    }

    #[tokio::test]
    async fn no_adapters_yields_nothing() {
        let orch = Orchestrator::new(Vec::new(), DEFAULT_TIMEOUT);
        let collected = orch.collect().await;
        assert!(collected.per_source.is_empty());
        assert_eq!(collected.succeeded(), 0);
    }
}
