mod commands;
mod logging;
mod progress;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ListGroupsArgs, ReportArgs, SelectArgs};
use dotenv::dotenv;
use jplag_sift_core::report::{write_cluster_report_file, write_pair_report_file};
use jplag_sift_core::{listing, AppConfig, ComparisonMode, ReportEngine, ReportOptions, Threshold};
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger(&logging::LogSettings::from_env());

    let config = match jplag_sift_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Report(args)) => run_report(&config, &args),
        Some(Commands::Select(args)) => run_select(&config, &args),
        Some(Commands::ListGroups(args)) => run_list_groups(&args),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_report(config: &AppConfig, args: &ReportArgs) -> Result<()> {
    let engine = ReportEngine::new(config.clone());
    let mode = ComparisonMode::from_grouped(args.grouped);
    let options = ReportOptions {
        mode,
        similarity: args.similarity.map(Threshold::new),
    };
    let reporter = CliReporter::new();
    let result = engine
        .run(&args.log, &args.results, &options, &reporter)
        .with_context(|| format!("building report for {}", args.log.display()))?;

    let base = args.output.as_deref().unwrap_or(args.log.as_path());
    let pairs_path = report_path(base, "_report.csv");
    let clusters_path = report_path(base, "_clusters_report.csv");
    write_pair_report_file(&pairs_path, &result.pairs)
        .with_context(|| format!("writing {}", pairs_path.display()))?;
    write_cluster_report_file(&clusters_path, &result.clusters, mode)
        .with_context(|| format!("writing {}", clusters_path.display()))?;

    info!(
        "Log: {}, Archive: {}, Aggregate: {}",
        format!("{:.2}s", result.log_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.archive_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.aggregate_duration.as_secs_f64()).green(),
    );
    info!(
        "{} comparisons, {} group pairs, {} reported",
        format!("{}", result.comparisons_read).cyan(),
        format!("{}", result.group_pairs).cyan(),
        format!("{}", result.pairs.len()).red(),
    );
    info!(
        "{} clusters parsed, {} reported",
        format!("{}", result.clusters_parsed).cyan(),
        format!("{}", result.clusters.len()).red(),
    );

    Ok(())
}

fn run_select(config: &AppConfig, args: &SelectArgs) -> Result<()> {
    let engine = ReportEngine::new(config.clone());
    let selected = engine
        .select_sources(&args.log, &args.sources, args.similarity.map(Threshold::new))
        .with_context(|| format!("selecting sources from {}", args.sources.display()))?;

    for path in &selected {
        println!("{}", path.display());
    }
    info!("{} sources selected", format!("{}", selected.len()).green());
    Ok(())
}

fn run_list_groups(args: &ListGroupsArgs) -> Result<()> {
    let report = fs::read_to_string(&args.report)
        .with_context(|| format!("reading {}", args.report.display()))?;
    for comparison in listing::list_cross_group(report.lines())? {
        println!("{}", comparison);
    }
    Ok(())
}

/// `<dir>/<stem><suffix>` next to `base`.
fn report_path(base: &Path, suffix: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.with_file_name(format!("{}{}", stem, suffix))
}
