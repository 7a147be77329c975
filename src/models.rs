//! Data models for the telemetry aggregation service.
//!
//! This module contains all the core data structures used throughout
//! the application for representing telemetry records, requests, and
//! computed region metrics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error message returned when no telemetry data is available.
///
/// The exact wording is part of the wire contract; existing clients
/// match on it.
pub const DATA_UNAVAILABLE_MESSAGE: &str = "Telemetry data file not found or is empty.";

/// A single telemetry measurement for a deployment region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Region identifier (e.g. "amer", "apac"). Not unique; many
    /// records share a region.
    pub region: String,
    /// Measured request latency in milliseconds.
    pub latency_ms: f64,
    /// Measured uptime percentage.
    pub uptime_pct: f64,
}

/// The in-memory telemetry dataset.
///
/// Loaded once at process start and never mutated afterwards, so it
/// can be shared across concurrent requests without locking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    records: Vec<TelemetryRecord>,
}

impl TelemetrySnapshot {
    /// Number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in load order.
    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }
}

impl From<Vec<TelemetryRecord>> for TelemetrySnapshot {
    fn from(records: Vec<TelemetryRecord>) -> Self {
        Self { records }
    }
}

/// Decoded body of a `POST /` aggregation request.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateRequest {
    /// Regions to aggregate. May be empty, contain duplicates, or name
    /// regions with no records.
    pub regions: Vec<String>,
    /// Latency threshold for breach counting.
    pub threshold_ms: f64,
}

/// Computed metrics for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    /// Arithmetic mean of the region's latencies.
    pub avg_latency: f64,
    /// 95th-percentile latency, linearly interpolated between ranks.
    pub p95_latency: f64,
    /// Arithmetic mean of the region's uptime percentages.
    pub avg_uptime: f64,
    /// Number of records whose latency strictly exceeds the threshold.
    pub breaches: usize,
}

/// Response body for an aggregation request.
///
/// Serialized untagged: a successful request produces a plain
/// region-to-metrics object, while an empty or missing snapshot
/// produces `{"error": "..."}`. Both are sent with HTTP 200; the error
/// is a body-level signal.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AggregateResponse {
    /// Metrics for every requested region that had at least one record.
    Metrics(BTreeMap<String, RegionMetrics>),
    /// The snapshot failed to load or holds no records.
    Error { error: String },
}

impl AggregateResponse {
    /// The canonical data-unavailable error response.
    pub fn data_unavailable() -> Self {
        Self::Error {
            error: DATA_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, latency_ms: f64, uptime_pct: f64) -> TelemetryRecord {
        TelemetryRecord {
            region: region.to_string(),
            latency_ms,
            uptime_pct,
        }
    }

    #[test]
    fn test_snapshot_from_records() {
        let snapshot = TelemetrySnapshot::from(vec![
            record("amer", 100.0, 99.9),
            record("apac", 150.0, 99.0),
        ]);
        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.records()[0].region, "amer");
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = TelemetrySnapshot::default();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }

    #[test]
    fn test_record_deserializes_from_snapshot_json() {
        let json = r#"{"region": "emea", "latency_ms": 123, "uptime_pct": 99.95}"#;
        let parsed: TelemetryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, record("emea", 123.0, 99.95));
    }

    #[test]
    fn test_request_deserializes() {
        let json = r#"{"regions": ["amer", "apac"], "threshold_ms": 150}"#;
        let request: AggregateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.regions, vec!["amer", "apac"]);
        assert_eq!(request.threshold_ms, 150.0);
    }

    #[test]
    fn test_metrics_response_serializes_as_plain_map() {
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "amer".to_string(),
            RegionMetrics {
                avg_latency: 150.0,
                p95_latency: 195.0,
                avg_uptime: 99.7,
                breaches: 1,
            },
        );

        let response = AggregateResponse::Metrics(metrics);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["amer"]["avg_latency"], 150.0);
        assert_eq!(json["amer"]["breaches"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_response_serializes_as_error_object() {
        let response = AggregateResponse::data_unavailable();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["error"], DATA_UNAVAILABLE_MESSAGE);
    }
}
