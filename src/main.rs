//! smartgrid-dash entry point: CLI wiring, config loading and mode dispatch.

use std::process;

use clap::Parser;
use tracing::info;

use smartgrid_dash::cli::Cli;
use smartgrid_dash::client::HttpSource;
use smartgrid_dash::config::DashboardConfig;
use smartgrid_dash::controller::{Dashboard, Settlement};
use smartgrid_dash::io::export::export_csv;
use smartgrid_dash::logging::{self, LogTarget};

fn load_config(cli: &Cli) -> DashboardConfig {
    let mut cfg = match cli.config {
        Some(ref path) => DashboardConfig::from_toml_file(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        }),
        None => DashboardConfig::default(),
    };
    cli.apply_overrides(&mut cfg);

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

/// Runs one evaluation without a terminal UI and prints the summary.
fn run_headless(cli: &Cli, cfg: &DashboardConfig) {
    let source = HttpSource::from_config(&cfg.server);
    info!(url = source.url(), "running headless evaluation");
    let mut dashboard = Dashboard::initialize();

    match dashboard.run_evaluation(&source) {
        Settlement::Rendered => {}
        _ => {
            let notice = dashboard.notice().unwrap_or("evaluation failed");
            eprintln!("error: {notice}");
            process::exit(1);
        }
    }

    if let Some(stats) = dashboard.stats() {
        println!("{stats}");
    }

    if let (Some(path), Some(result)) = (&cli.export, dashboard.last_result()) {
        if let Err(e) = export_csv(result, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path.display(), rows = result.len(), "exported evaluation");
        eprintln!("Evaluation written to {}", path.display());
    }
}

#[cfg(feature = "tui")]
fn run_dashboard(cli: &Cli, cfg: &DashboardConfig) {
    use std::sync::Arc;

    use smartgrid_dash::tui::{self, runtime::App};

    let source = HttpSource::from_config(&cfg.server);
    let endpoint = source.url().to_string();
    let app = App::new(
        Arc::new(source),
        endpoint,
        cfg.ui.tick_ms,
        cli.export.clone(),
    );
    if let Err(e) = tui::run(app, cfg.ui.auto_run) {
        eprintln!("error: TUI crashed: {e}");
        process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn run_dashboard(_cli: &Cli, _cfg: &DashboardConfig) {
    eprintln!("error: built without the `tui` feature; use --once");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    let cfg = load_config(&cli);

    let target = match (&cfg.logging.file, cli.once) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Off,
    };
    if let Err(e) = logging::init(&cfg.logging.level, target) {
        eprintln!("error: failed to initialize logging: {e}");
        process::exit(1);
    }

    if cli.once {
        run_headless(&cli, &cfg);
    } else {
        run_dashboard(&cli, &cfg);
    }
}
