use crate::archive;
use crate::cluster;
use crate::config::AppConfig;
use crate::error::Error;
use crate::log;
use crate::model::{ComparisonMode, GroupPairSimilarity, SelectedCluster, Threshold};
use crate::pairs::{self, PairAggregator};
use crate::progress::ProgressReporter;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct ReportEngine {
    config: AppConfig,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub mode: ComparisonMode,
    /// User threshold for both pairs and clusters. Without it pairs fall
    /// back to the top ten and clusters to the configured threshold.
    pub similarity: Option<Threshold>,
}

#[derive(Debug)]
pub struct ReportResult {
    pub pairs: Vec<GroupPairSimilarity>,
    pub clusters: Vec<SelectedCluster>,
    pub comparisons_read: usize,
    pub group_pairs: usize,
    pub clusters_parsed: usize,
    pub clusters_announced: Option<usize>,
    pub log_duration: Duration,
    pub archive_duration: Duration,
    pub aggregate_duration: Duration,
}

impl ReportEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full report pipeline:
    /// 1. Parse clusters from the log
    /// 2. Read comparisons from the results archive
    /// 3. Keep the best similarity per group pair and select pairs
    /// 4. Filter clusters spanning several groups
    pub fn run(
        &self,
        log_path: &Path,
        archive_path: &Path,
        options: &ReportOptions,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReportResult, Error> {
        // Phase 1: Log
        info!("Parsing clusters from {}", log_path.display());
        reporter.on_log_start();
        let log_start = Instant::now();
        let parsed = log::read_log(log_path)?;
        let log_duration = log_start.elapsed();
        reporter.on_log_complete(parsed.clusters.len(), log_duration.as_secs_f64());

        // Phase 2: Archive
        let archive_start = Instant::now();
        let comparisons = archive::read_comparisons(archive_path, options.mode, reporter)?;
        let archive_duration = archive_start.elapsed();

        // Phase 3: Aggregate
        let aggregate_start = Instant::now();
        let comparisons_read = comparisons.len();
        let aggregator = PairAggregator::new(options.mode).fold(comparisons)?;
        let group_pairs = aggregator.len();
        let pair_threshold = options
            .similarity
            .map(|threshold| self.config.pair_scale.apply(threshold));
        let pairs = pairs::select_pairs(aggregator.into_ranked(), pair_threshold);
        debug!(
            "{} of {} group pairs selected (threshold {:?})",
            pairs.len(),
            group_pairs,
            pair_threshold
        );

        // Phase 4: Clusters
        let cluster_threshold = self.cluster_threshold(options.similarity);
        let clusters = cluster::filter_clusters(&parsed.clusters, cluster_threshold, options.mode)?;
        let aggregate_duration = aggregate_start.elapsed();

        Ok(ReportResult {
            pairs,
            clusters,
            comparisons_read,
            group_pairs,
            clusters_parsed: parsed.clusters.len(),
            clusters_announced: parsed.announced,
            log_duration,
            archive_duration,
            aggregate_duration,
        })
    }

    /// Pick one source per strongly similar cluster from `sources_dir`.
    /// Returns the selected paths, sorted.
    pub fn select_sources(
        &self,
        log_path: &Path,
        sources_dir: &Path,
        similarity: Option<Threshold>,
    ) -> Result<Vec<PathBuf>, Error> {
        let files = list_sources(sources_dir)?;
        let all_sources: BTreeSet<String> = files.keys().cloned().collect();
        info!(
            "Found {} sources in {}",
            all_sources.len(),
            sources_dir.display()
        );

        let parsed = log::read_log(log_path)?;
        let threshold = similarity
            .map(Threshold::percent)
            .unwrap_or(self.config.select_threshold);
        let selected = cluster::select_sources(&all_sources, &parsed.clusters, threshold)?;

        // representatives missing from the directory have no path to report
        let mut paths: Vec<PathBuf> = selected
            .iter()
            .filter_map(|name| files.get(name).cloned())
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn cluster_threshold(&self, similarity: Option<Threshold>) -> f64 {
        similarity
            .map(Threshold::percent)
            .unwrap_or(self.config.cluster_threshold)
    }
}

/// Map file name to path for every entry directly inside `dir`.
fn list_sources(dir: &Path) -> Result<BTreeMap<String, PathBuf>, Error> {
    let mut files = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::Other(format!("Source name is not valid UTF-8: {}", path.display()))
            })?
            .to_string();
        files.insert(name, path);
    }
    Ok(files)
}
