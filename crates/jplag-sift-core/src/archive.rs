use crate::error::Error;
use crate::filename::parse_comparison;
use crate::model::ComparisonMode;
use crate::progress::ProgressReporter;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};
use zip::ZipArchive;

/// Summary entry JPlag writes next to the comparisons.
pub const OVERVIEW_ENTRY: &str = "overview.json";

/// Content of a comparison entry: either a bare number or JPlag's
/// comparison object carrying a `similarity` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComparisonContent {
    Bare(f64),
    Report { similarity: f64 },
}

impl ComparisonContent {
    fn similarity(&self) -> f64 {
        match self {
            ComparisonContent::Bare(value) => *value,
            ComparisonContent::Report { similarity } => *similarity,
        }
    }
}

/// Entry names that do not hold a comparison to aggregate: anything not
/// ending in `.json`, the overview, and (for single submissions) two
/// submissions of the same group.
pub fn select_excluded_entries<I, S>(names: I, mode: ComparisonMode) -> Result<HashSet<String>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut excluded = HashSet::new();
    for name in names {
        let name = name.as_ref();
        let is_result = name.ends_with(".json") && name != OVERVIEW_ENTRY;
        let exclude = if !is_result {
            true
        } else if mode == ComparisonMode::Submissions {
            let comparison = parse_comparison(name)?;
            comparison.first.group_id == comparison.second.group_id
        } else {
            false
        };
        if exclude {
            excluded.insert(name.to_string());
        }
    }
    Ok(excluded)
}

/// Read every comparison from a JPlag results archive.
///
/// Returns `(entry name, similarity)` ordered by descending similarity,
/// then by name.
pub fn read_comparisons(
    path: &Path,
    mode: ComparisonMode,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<(String, f64)>, Error> {
    info!("Reading comparisons from {}", path.display());
    let file = File::open(path)?;
    read_comparisons_from(file, mode, reporter)
}

pub fn read_comparisons_from<R: Read + Seek>(
    reader: R,
    mode: ComparisonMode,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<(String, f64)>, Error> {
    let start = Instant::now();
    let mut archive = ZipArchive::new(reader)?;
    let total = archive.len();
    reporter.on_archive_start(total);

    let excluded = select_excluded_entries(archive.file_names(), mode)?;
    debug!("{} of {} archive entries excluded", excluded.len(), total);

    let mut comparisons = Vec::with_capacity(total.saturating_sub(excluded.len()));
    for index in 0..total {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() || excluded.contains(entry.name()) {
            reporter.on_archive_progress(index + 1, total);
            continue;
        }
        let mut contents = String::new();
        entry.read_to_string(&mut contents)?;
        let content: ComparisonContent = serde_json::from_str(&contents)?;
        comparisons.push((entry.name().to_string(), content.similarity()));
        reporter.on_archive_progress(index + 1, total);
    }

    comparisons.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    reporter.on_archive_complete(comparisons.len(), start.elapsed().as_secs_f64());
    Ok(comparisons)
}
