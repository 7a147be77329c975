//! Snapshot loading from the telemetry JSON file.
//!
//! The backing file is a JSON array of `{region, latency_ms,
//! uptime_pct}` objects. Loading happens exactly once at startup; a
//! missing or unreadable file degrades to an empty snapshot instead of
//! failing the process, and the empty case is reported to clients as a
//! body-level error by the HTTP layer.

use crate::models::{TelemetryRecord, TelemetrySnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Why a snapshot could not be loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read telemetry file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse telemetry file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load the snapshot, returning an error on any read or parse failure.
pub fn try_load_snapshot(path: &Path) -> Result<TelemetrySnapshot, SnapshotError> {
    let content = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<TelemetryRecord> =
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(TelemetrySnapshot::from(records))
}

/// Load the snapshot, degrading to an empty one on failure.
///
/// The process must come up even without data; requests against an
/// empty snapshot get the data-unavailable error payload.
pub fn load_snapshot(path: &Path) -> TelemetrySnapshot {
    match try_load_snapshot(path) {
        Ok(snapshot) => {
            info!(
                "Loaded {} telemetry records from {}",
                snapshot.len(),
                path.display()
            );
            snapshot
        }
        Err(e) => {
            warn!("Telemetry snapshot unavailable, serving empty dataset: {}", e);
            TelemetrySnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_snapshot() {
        let file = write_temp(
            r#"[
                {"region": "amer", "latency_ms": 100, "uptime_pct": 99.9},
                {"region": "apac", "latency_ms": 150.5, "uptime_pct": 99.0}
            ]"#,
        );

        let snapshot = try_load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.records()[1].latency_ms, 150.5);
    }

    #[test]
    fn test_load_empty_array() {
        let file = write_temp("[]");
        let snapshot = try_load_snapshot(file.path()).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = try_load_snapshot(Path::new("/nonexistent/telemetry.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Read { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let file = write_temp("{not json");
        let err = try_load_snapshot(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
    }

    #[test]
    fn test_load_snapshot_degrades_to_empty() {
        let snapshot = load_snapshot(Path::new("/nonexistent/telemetry.json"));
        assert!(snapshot.is_empty());

        let file = write_temp("not an array");
        let snapshot = load_snapshot(file.path());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_load_fixture() {
        let snapshot = try_load_snapshot(Path::new("fixtures/sample-telemetry.json")).unwrap();
        assert!(!snapshot.is_empty());
        assert!(snapshot.records().iter().any(|r| r.region == "amer"));
    }
}
