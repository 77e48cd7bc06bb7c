use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jail_report::cli::Args;
use jail_report::report::render_report;
use jail_report::resources::APP_NAME;
use jail_report::{BanStore, ConfigResolver, ConfigTree, QueryCatalog, ReportContext};

/// Diagnostics go to stderr so stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    if args.show_version {
        println!(
            "{APP_NAME} v{} - {}",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION")
        );
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let defaults = ConfigTree::builtin_defaults()?;
    let primary = ConfigTree::load_or_empty(&args.config);
    let config = ConfigResolver::new(&primary, &defaults);
    let catalog = QueryCatalog::new(config);

    let now = Utc::now().timestamp();
    let ctx = ReportContext::new(args.selection_mode(), now, config.ban_ignore_threshold(now))
        .with_window(args.time_window());

    let db_file = args
        .db_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.db_file()));
    let store = BanStore::open_read_only(&db_file).inspect_err(|_| {
        tracing::warn!("Do you have read permissions for {}?", db_file.display());
    })?;

    let report = render_report(&store, &catalog, &ctx, &args.jail_filter(), args.output_format());
    store.close()?;

    write_report(args.output.as_deref(), &report?)
}

fn write_report(output: Option<&Path>, report: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{report}\n"))
            .with_context(|| format!("Failed to write report to {}", path.display())),
        None => {
            println!("{report}");
            Ok(())
        }
    }
}
