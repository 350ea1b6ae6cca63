use std::collections::BTreeSet;

/// Whether archive entries and cluster members name single submissions
/// (`sub<gid>_<idx>_<score>_<.ext>`) or whole groups (`<gid>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonMode {
    #[default]
    Submissions,
    Grouped,
}

impl ComparisonMode {
    pub fn from_grouped(grouped: bool) -> Self {
        if grouped {
            ComparisonMode::Grouped
        } else {
            ComparisonMode::Submissions
        }
    }

    pub fn is_grouped(self) -> bool {
        self == ComparisonMode::Grouped
    }
}

/// A cluster of mutually similar submissions as reported in the detector log.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub strength: f64,
    /// Average similarity on a 0-100 scale.
    pub avg_similarity: f64,
    pub members: BTreeSet<String>,
}

/// A cluster that passed the reporting filter, with the groups it spans.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCluster {
    pub cluster: Cluster,
    /// Distinct group ids, ascending.
    pub groups: Vec<u64>,
}

/// Best similarity observed between two different groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPairSimilarity {
    pub group_id1: u64,
    pub group_id2: u64,
    pub similarity: f64,
    /// Archive entry the similarity was read from.
    pub source_name: String,
}

impl GroupPairSimilarity {
    pub fn key(&self) -> (u64, u64) {
        (self.group_id1, self.group_id2)
    }
}

/// User-facing similarity threshold. Values up to 1.0 are fractions,
/// anything above is a percentage. The value is kept in the scale it was
/// given in and only converted when read in the other one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Fraction(f64),
    Percent(f64),
}

impl Threshold {
    pub fn new(value: f64) -> Self {
        if value <= 1.0 {
            Threshold::Fraction(value)
        } else {
            Threshold::Percent(value)
        }
    }

    pub fn fraction(self) -> f64 {
        match self {
            Threshold::Fraction(value) => value,
            Threshold::Percent(value) => value / 100.0,
        }
    }

    pub fn percent(self) -> f64 {
        match self {
            Threshold::Fraction(value) => value * 100.0,
            Threshold::Percent(value) => value,
        }
    }
}
