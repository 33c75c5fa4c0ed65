// src/stats.rs

//! Aggregate statistics over measured run durations.

use std::time::Duration;

/// Summary of a set of successful run durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub range: Duration,
}

/// Reduce `durations` to mean/min/max/range.
///
/// - Empty input gives all-zero statistics.
/// - The mean truncates to whole nanoseconds.
/// - Input order does not matter; the caller's slice is left untouched.
pub fn compute_statistics(durations: &[Duration]) -> Statistics {
    if durations.is_empty() {
        return Statistics::default();
    }

    let mut sorted = durations.to_vec();
    sorted.sort_unstable();

    let total: u128 = sorted.iter().map(Duration::as_nanos).sum();
    let mean_nanos = total / sorted.len() as u128;

    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Statistics {
        mean: duration_from_nanos(mean_nanos),
        min,
        max,
        range: max - min,
    }
}

/// The mean of durations is bounded by their max, so this never saturates in
/// practice; it only guards the u128 -> u64 narrowing.
fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = (nanos / 1_000_000_000) as u64;
    let sub = (nanos % 1_000_000_000) as u32;
    Duration::new(secs, sub)
}

/// Population standard deviation of `durations` around `mean`.
///
/// Zero for empty input.
pub fn std_deviation(durations: &[Duration], mean: Duration) -> Duration {
    if durations.is_empty() {
        return Duration::ZERO;
    }
    let mean = mean.as_secs_f64();
    let variance = durations
        .iter()
        .map(|d| {
            let diff = d.as_secs_f64() - mean;
            diff * diff
        })
        .sum::<f64>()
        / durations.len() as f64;
    Duration::from_secs_f64(variance.sqrt())
}
