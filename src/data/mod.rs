//! Telemetry data loading.
//!
//! This module loads the on-disk telemetry snapshot into memory at
//! process start.

pub mod loader;

pub use loader::{load_snapshot, try_load_snapshot, SnapshotError};
