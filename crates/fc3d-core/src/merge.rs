//! Merge per-source draw lists into one bounded, newest-first sequence.

use std::collections::HashMap;

use tracing::debug;

use crate::draw::{DrawResult, RawDraw};

/// Default number of records kept in a snapshot.
pub const DEFAULT_WINDOW: usize = 50;

/// Merge draws reported by several sources.
///
/// `per_source` is in precedence order: the first list is the most trusted.
/// For a period reported by more than one source the first-seen record wins
/// and later reports are ignored. Items that fail validation are dropped.
/// The result is sorted by period descending and truncated to `window`.
pub fn merge<S>(per_source: &[S], window: usize) -> Vec<DrawResult>
where
    S: AsRef<[RawDraw]>,
{
    let mut by_period: HashMap<String, DrawResult> = HashMap::new();

    for (rank, draws) in per_source.iter().enumerate() {
        for raw in draws.as_ref() {
            if by_period.contains_key(&raw.period) {
                continue;
            }
            match DrawResult::from_raw(raw.clone()) {
                Ok(draw) => {
                    by_period.insert(draw.period().to_string(), draw);
                }
                Err(e) => debug!(rank, period = %raw.period, error = %e, "dropping invalid draw"),
            }
        }
    }

    let mut merged: Vec<DrawResult> = by_period.into_values().collect();
    merged.sort_unstable_by(|a, b| b.period().cmp(a.period()));
    merged.truncate(window);
    merged
}
