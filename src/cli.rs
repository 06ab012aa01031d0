//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DashboardConfig;

/// Terminal dashboard for smart-grid battery evaluations.
#[derive(Debug, Parser)]
#[command(name = "smartgrid-dash", version)]
pub struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Server base URL, overrides `server.base_url`
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
    /// Run one evaluation, print the summary and exit
    #[arg(long)]
    pub once: bool,
    /// CSV file for the evaluated series
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
    /// Log file, overrides `logging.file`
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Do not evaluate at start-up; wait for `r`
    #[arg(long)]
    pub no_auto_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, cfg: &mut DashboardConfig) {
        if let Some(url) = &self.url {
            cfg.server.base_url.clone_from(url);
        }
        if let Some(path) = &self.log_file {
            cfg.logging.file = Some(path.clone());
        }
        if self.no_auto_run {
            cfg.ui.auto_run = false;
        }
    }
}
