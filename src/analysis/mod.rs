//! Analysis modules.
//!
//! This module contains the per-region statistical aggregation that
//! backs the HTTP endpoint.

pub mod aggregator;

pub use aggregator::*;
