//! Testing utilities for tadpole.

#![allow(dead_code)]

pub mod synthetic;

use crate::common::Mask;
use crate::config::Connectivity;
use crate::labeling::{LabelMap, label_components};

/// Initialize tracing subscriber for tests.
/// Safe to call multiple times, only the first call installs it.
/// Respects RUST_LOG env var, defaults to "warn".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Number of connected pieces of `label` under `connectivity`.
pub fn piece_count(labels: &LabelMap, label: u32, connectivity: Connectivity) -> usize {
    label_components(&labels.footprint(label), connectivity).num_labels()
}

/// Count of pixels set in both masks.
pub fn overlap_count(a: &Mask, b: &Mask) -> usize {
    a.iter().zip(b.iter()).filter(|&(&p, &q)| p && q).count()
}
