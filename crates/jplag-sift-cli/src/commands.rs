use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "jplag-sift")]
#[command(about = "Sift JPlag logs and results into reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report the most similar group pairs and the clusters spanning several groups
    Report(ReportArgs),
    /// Print the sources to keep, one per similar cluster
    Select(SelectArgs),
    /// List comparisons between different groups from a text report
    ListGroups(ListGroupsArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// JPlag log file
    #[arg(value_name = "JPLAG_LOG")]
    pub log: PathBuf,
    /// JPlag results in zip format
    #[arg(value_name = "JPLAG_RESULTS")]
    pub results: PathBuf,
    /// Submissions are analyzed grouped
    #[arg(short, long)]
    pub grouped: bool,
    /// Base name for report files [default: JPLAG_LOG]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Similarity threshold, as a fraction or a percentage
    #[arg(short, long, value_parser = parse_similarity)]
    pub similarity: Option<f64>,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// JPlag log file
    #[arg(value_name = "JPLAG_LOG")]
    pub log: PathBuf,
    /// Directory with submission sources
    #[arg(value_name = "SOURCES_DIR")]
    pub sources: PathBuf,
    /// Similarity threshold, as a fraction or a percentage
    #[arg(short, long, value_parser = parse_similarity)]
    pub similarity: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ListGroupsArgs {
    /// JPlag clean report file
    #[arg(value_name = "JPLAG_REPORT")]
    pub report: PathBuf,
}

/// `-s` accepts a fraction (up to 1.0) or a percentage (up to 100).
fn parse_similarity(value: &str) -> Result<f64, String> {
    let similarity: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=100.0).contains(&similarity) {
        Ok(similarity)
    } else {
        Err(format!("{similarity} is outside 0..=100"))
    }
}
