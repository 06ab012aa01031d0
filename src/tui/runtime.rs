//! TUI application state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::client::EvaluationSource;
use crate::controller::{Dashboard, Evaluator};
use crate::io::export::export_csv;

/// TUI application state.
pub struct App {
    /// Charts, statistics, busy phase and notices.
    pub dashboard: Dashboard,
    /// Background request runner.
    evaluator: Evaluator,
    /// Endpoint shown in the header.
    pub endpoint: String,
    /// CSV target for the `e` key.
    export_path: Option<PathBuf>,
    /// One-line message shown in the footer.
    pub status: Option<String>,
    /// Event-loop poll interval in milliseconds.
    tick_ms: u64,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the event loop last woke.
    pub last_tick: Instant,
}

impl App {
    /// Creates the app with empty charts. No request is issued yet.
    pub fn new(
        source: Arc<dyn EvaluationSource>,
        endpoint: impl Into<String>,
        tick_ms: u64,
        export_path: Option<PathBuf>,
    ) -> Self {
        Self {
            dashboard: Dashboard::initialize(),
            evaluator: Evaluator::new(source),
            endpoint: endpoint.into(),
            export_path,
            status: None,
            tick_ms,
            quit: false,
            last_tick: Instant::now(),
        }
    }

    /// Starts an evaluation in the background.
    pub fn run_evaluation(&mut self) {
        self.status = None;
        self.evaluator.trigger(&mut self.dashboard);
    }

    /// Applies any finished requests. Returns how many arrived.
    pub fn poll_results(&mut self) -> usize {
        self.evaluator.drain(&mut self.dashboard)
    }

    /// Dismisses the notice currently shown.
    pub fn dismiss_notice(&mut self) {
        self.dashboard.dismiss_notice();
    }

    /// Writes the last rendered result to the export path.
    pub fn export(&mut self) {
        let Some(path) = self.export_path.clone() else {
            self.status = Some("no export path (start with --export <path>)".to_string());
            return;
        };
        let Some(result) = self.dashboard.last_result() else {
            self.status = Some("nothing to export yet".to_string());
            return;
        };
        match export_csv(result, &path) {
            Ok(()) => {
                info!(path = %path.display(), "exported evaluation");
                self.status = Some(format!("exported {} rows to {}", result.len(), path.display()));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "export failed");
                self.status = Some(format!("export failed: {e}"));
            }
        }
    }

    /// Returns the event-loop poll interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_ms
    }
}
