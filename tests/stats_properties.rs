// tests/stats_properties.rs

use std::time::Duration;

use proptest::prelude::*;

use chrono_bench::stats::{Statistics, compute_statistics, std_deviation};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn empty_input_is_all_zero() {
    assert_eq!(compute_statistics(&[]), Statistics::default());
    let stats = compute_statistics(&[]);
    assert_eq!(stats.mean, Duration::ZERO);
    assert_eq!(stats.range, Duration::ZERO);
}

#[test]
fn single_value_has_zero_range() {
    let stats = compute_statistics(&[ms(250)]);
    assert_eq!(stats.mean, ms(250));
    assert_eq!(stats.min, ms(250));
    assert_eq!(stats.max, ms(250));
    assert_eq!(stats.range, Duration::ZERO);
}

#[test]
fn mean_min_max_range_of_known_values() {
    let stats = compute_statistics(&[ms(300), ms(100), ms(200)]);
    assert_eq!(stats.mean, ms(200));
    assert_eq!(stats.min, ms(100));
    assert_eq!(stats.max, ms(300));
    assert_eq!(stats.range, ms(200));
}

#[test]
fn mean_truncates_to_whole_nanoseconds() {
    let values = [Duration::from_nanos(1), Duration::from_nanos(2)];
    assert_eq!(compute_statistics(&values).mean, Duration::from_nanos(1));
}

#[test]
fn input_slice_is_not_reordered() {
    let values = vec![ms(3), ms(1), ms(2)];
    let before = values.clone();
    let _ = compute_statistics(&values);
    assert_eq!(values, before);
}

#[test]
fn std_deviation_is_the_population_spread() {
    let values = [ms(2), ms(4), ms(4), ms(4), ms(5), ms(5), ms(7), ms(9)];
    let mean = compute_statistics(&values).mean;
    assert_eq!(mean, ms(5));

    let spread = std_deviation(&values, mean);
    assert!(spread.abs_diff(ms(2)) < Duration::from_nanos(10));

    assert_eq!(std_deviation(&[], Duration::ZERO), Duration::ZERO);
    assert_eq!(std_deviation(&[ms(3), ms(3)], ms(3)), Duration::ZERO);
}

proptest! {
    #[test]
    fn min_le_mean_le_max(nanos in proptest::collection::vec(0u64..10_000_000_000, 1..50)) {
        let values: Vec<Duration> = nanos.iter().copied().map(Duration::from_nanos).collect();
        let stats = compute_statistics(&values);
        prop_assert!(stats.min <= stats.mean);
        prop_assert!(stats.mean <= stats.max);
        prop_assert_eq!(stats.range, stats.max - stats.min);
        prop_assert_eq!(Some(&stats.min), values.iter().min());
        prop_assert_eq!(Some(&stats.max), values.iter().max());
    }

    #[test]
    fn order_does_not_matter(nanos in proptest::collection::vec(0u64..1_000_000_000, 0..30)) {
        let values: Vec<Duration> = nanos.iter().copied().map(Duration::from_nanos).collect();
        let mut reversed = values.clone();
        reversed.reverse();
        let mut sorted = values.clone();
        sorted.sort();
        let stats = compute_statistics(&values);
        prop_assert_eq!(stats, compute_statistics(&reversed));
        prop_assert_eq!(stats, compute_statistics(&sorted));
    }
}
