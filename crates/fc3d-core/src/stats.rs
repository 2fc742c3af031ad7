//! Frequency analysis over a recent window of draws.
//!
//! Hot digits are the most frequent in the window, cold digits the least.
//! Ties are broken by the lower digit so the output is stable.
//!
//! [`predict`] turns the same frequencies into a pick: each digit is weighted
//! by its count plus a random jitter, and the heaviest digits win. The RNG is
//! passed in so a seeded generator gives a repeatable pick.

use std::collections::BTreeMap;

use rand::Rng;

use crate::draw::{DrawResult, DrawType};

/// Default number of newest draws analysed.
pub const DEFAULT_STATS_WINDOW: usize = 30;

/// How many digits are reported as hot and as cold.
pub const HOT_COLD_COUNT: usize = 3;

/// Digits in a direct 3D pick.
pub const PICK_3D: usize = 3;

/// Digits in a five-code pick.
pub const PICK_5_CODE: usize = 5;

/// Upper bound of the random weight added to each digit's count.
const PICK_JITTER: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DigitStats {
    /// Draws actually analysed (degraded records excluded).
    pub draws: usize,
    /// Occurrences of each digit 0..=9 across all positions.
    pub frequency: [usize; 10],
    pub hot: Vec<u8>,
    pub cold: Vec<u8>,
    pub type_counts: BTreeMap<DrawType, usize>,
    pub mean_sum: f64,
    pub mean_span: f64,
}

/// Analyse the newest `window` draws of `draws` (which must be newest-first,
/// as stored in a snapshot).
pub fn analyse(draws: &[DrawResult], window: usize) -> DigitStats {
    let recent: Vec<&DrawResult> = draws
        .iter()
        .filter(|d| !d.is_degraded())
        .take(window)
        .collect();

    let mut frequency = [0usize; 10];
    let mut type_counts: BTreeMap<DrawType, usize> =
        DrawType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut sum_total = 0usize;
    let mut span_total = 0usize;

    for draw in &recent {
        for n in draw.numbers() {
            frequency[usize::from(n)] += 1;
        }
        *type_counts.entry(draw.draw_type()).or_default() += 1;
        sum_total += usize::from(draw.sum());
        span_total += usize::from(draw.span());
    }

    let mut by_freq: Vec<(u8, usize)> = (0..10u8).map(|d| (d, frequency[usize::from(d)])).collect();
    by_freq.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let hot = by_freq.iter().take(HOT_COLD_COUNT).map(|(d, _)| *d).collect();

    by_freq.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    let cold = by_freq.iter().take(HOT_COLD_COUNT).map(|(d, _)| *d).collect();

    let n = recent.len();
    let mean = |total: usize| if n == 0 { 0.0 } else { total as f64 / n as f64 };

    DigitStats {
        draws: n,
        frequency,
        hot,
        cold,
        type_counts,
        mean_sum: mean(sum_total),
        mean_span: mean(span_total),
    }
}

/// Pick `count` distinct digits (at most 10), ascending, from the newest
/// [`DEFAULT_STATS_WINDOW`] draws. A digit seen more often is more likely
/// to be picked but never certain to be unless its lead exceeds the jitter.
pub fn predict(draws: &[DrawResult], count: usize, rng: &mut impl Rng) -> Vec<u8> {
    let frequency = analyse(draws, DEFAULT_STATS_WINDOW).frequency;

    let mut weighted: Vec<(u8, f64)> = (0..10u8)
        .map(|d| {
            let jitter = rng.gen_range(0.0..PICK_JITTER);
            (d, frequency[usize::from(d)] as f64 + jitter)
        })
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut pick: Vec<u8> = weighted.into_iter().take(count).map(|(d, _)| d).collect();
    pick.sort_unstable();
    pick
}
