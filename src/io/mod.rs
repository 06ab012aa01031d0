//! File input/output.

/// CSV export of evaluation results.
pub mod export;
