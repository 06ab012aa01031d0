//! Terminal dashboard for smart-grid battery evaluations.

pub mod charts;
pub mod cli;
pub mod client;
pub mod config;
/// Evaluation lifecycle and chart updates.
pub mod controller;
pub mod io;
pub mod logging;
pub mod model;
pub mod stats;
#[cfg(feature = "tui")]
pub mod tui;
