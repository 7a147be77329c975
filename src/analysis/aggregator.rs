//! Per-region telemetry aggregation and statistics.
//!
//! This module computes summary metrics (mean latency, p95 latency,
//! mean uptime, threshold breaches) for each requested region over the
//! immutable telemetry snapshot.

use crate::models::{RegionMetrics, TelemetrySnapshot};
use std::collections::BTreeMap;

/// Aggregate metrics for each requested region.
///
/// Regions are processed in the order they first appear in `regions`;
/// duplicates are skipped so each distinct region is computed exactly
/// once. Regions with no matching records are silently omitted from
/// the result, so an empty snapshot or an empty region list both yield
/// an empty map.
///
/// Pure and deterministic: identical inputs always produce identical
/// output, and the snapshot is never mutated, so concurrent calls are
/// safe without locking.
pub fn aggregate_regions(
    snapshot: &TelemetrySnapshot,
    regions: &[String],
    threshold_ms: f64,
) -> BTreeMap<String, RegionMetrics> {
    let mut result = BTreeMap::new();

    for region in regions {
        if result.contains_key(region) {
            continue;
        }

        // Exact, case-sensitive region match.
        let matching: Vec<_> = snapshot
            .records()
            .iter()
            .filter(|record| record.region == *region)
            .collect();

        if matching.is_empty() {
            continue;
        }

        let mut latencies: Vec<f64> = matching.iter().map(|r| r.latency_ms).collect();
        let uptimes: Vec<f64> = matching.iter().map(|r| r.uptime_pct).collect();

        let avg_latency = mean(&latencies);
        let avg_uptime = mean(&uptimes);
        // Strict inequality: a latency equal to the threshold is not a breach.
        let breaches = latencies.iter().filter(|&&lat| lat > threshold_ms).count();

        latencies.sort_by(|a, b| a.total_cmp(b));
        let p95_latency = percentile(&latencies, 95.0);

        result.insert(
            region.clone(),
            RegionMetrics {
                avg_latency,
                p95_latency,
                avg_uptime,
                breaches,
            },
        );
    }

    result
}

/// Arithmetic mean of `values`. The caller guarantees a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile of an ascending-sorted slice, using linear interpolation
/// between closest ranks: `rank = pct/100 * (n - 1)`, interpolating
/// between the floor and ceil indices. Matches the default percentile
/// definition of standard numeric libraries. The caller guarantees a
/// non-empty slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;

    if lo == hi {
        return sorted[lo];
    }

    let weight = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * weight
}
