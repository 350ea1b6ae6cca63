use crate::error::Error;
use crate::filename::parse_comparison_name;
use crate::model::{ComparisonMode, GroupPairSimilarity};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

/// Number of pairs reported when no similarity threshold is given.
pub const DEFAULT_TOP_N: usize = 10;

/// Folds pairwise comparisons into the best similarity per group pair.
#[derive(Debug, Default)]
pub struct PairAggregator {
    mode: ComparisonMode,
    exclusions: HashSet<String>,
    best: BTreeMap<(u64, u64), GroupPairSimilarity>,
    seen: usize,
    skipped: usize,
}

impl PairAggregator {
    pub fn new(mode: ComparisonMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Entry names to leave out regardless of their content.
    pub fn with_exclusions(mut self, exclusions: HashSet<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Account for one comparison. Only positive similarities are stored,
    /// and a stored pair is only replaced by a strictly greater one, so on
    /// ties the first one seen stays.
    pub fn add(&mut self, name: &str, similarity: f64) -> Result<(), Error> {
        self.seen += 1;
        if self.exclusions.contains(name) {
            self.skipped += 1;
            return Ok(());
        }

        let comparison = parse_comparison_name(name, self.mode)?;
        if self.mode == ComparisonMode::Submissions && comparison.is_same_group() {
            trace!("Skipping same-group comparison {}", name);
            self.skipped += 1;
            return Ok(());
        }

        let key = comparison.pair_key();
        let improves = self
            .best
            .get(&key)
            .map_or(similarity > 0.0, |current| similarity > current.similarity);
        if improves {
            self.best.insert(
                key,
                GroupPairSimilarity {
                    group_id1: key.0,
                    group_id2: key.1,
                    similarity,
                    source_name: name.to_string(),
                },
            );
        }
        Ok(())
    }

    pub fn fold<I, S>(mut self, comparisons: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        for (name, similarity) in comparisons {
            self.add(name.as_ref(), similarity)?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    /// All retained pairs, most similar first. Equal similarities are
    /// ordered by group pair.
    pub fn into_ranked(self) -> Vec<GroupPairSimilarity> {
        debug!(
            "{} comparisons seen, {} skipped, {} group pairs retained",
            self.seen,
            self.skipped,
            self.best.len()
        );
        let mut ranked: Vec<GroupPairSimilarity> = self.best.into_values().collect();
        // BTreeMap order is by key, and the sort is stable
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        ranked
    }
}

/// Pick the pairs to report from a ranked list.
///
/// With a threshold, every pair strictly above it is kept. Without one,
/// only the [`DEFAULT_TOP_N`] most similar pairs are.
pub fn select_pairs(
    ranked: Vec<GroupPairSimilarity>,
    threshold: Option<f64>,
) -> Vec<GroupPairSimilarity> {
    match threshold {
        Some(threshold) => ranked
            .into_iter()
            .filter(|pair| pair.similarity > threshold)
            .collect(),
        None => ranked.into_iter().take(DEFAULT_TOP_N).collect(),
    }
}

/// Aggregate and rank in one go.
pub fn aggregate<I, S>(
    comparisons: I,
    mode: ComparisonMode,
    exclusions: HashSet<String>,
) -> Result<Vec<GroupPairSimilarity>, Error>
where
    I: IntoIterator<Item = (S, f64)>,
    S: AsRef<str>,
{
    Ok(PairAggregator::new(mode)
        .with_exclusions(exclusions)
        .fold(comparisons)?
        .into_ranked())
}
