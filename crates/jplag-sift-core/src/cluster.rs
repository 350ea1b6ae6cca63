use crate::error::Error;
use crate::filename::{parse_group_id, parse_submission};
use crate::model::{Cluster, ComparisonMode, SelectedCluster};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Member of a cluster decoded for ranking.
struct RankedMember<'a> {
    group_id: u64,
    score: f64,
    submission_index: u64,
    name: &'a str,
}

impl<'a> RankedMember<'a> {
    fn parse(name: &'a str) -> Result<Self, Error> {
        let token = parse_submission(name)?;
        Ok(Self {
            group_id: token.group_id,
            // unscored submissions rank like a zero score
            score: token.score.unwrap_or(0.0),
            submission_index: token.submission_index,
            name,
        })
    }

    fn by_score(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.submission_index.cmp(&other.submission_index))
            .then(self.name.cmp(other.name))
    }
}

/// Choose the members that stand in for `cluster`.
///
/// Members are ranked by ascending `(score, submission index)`. When the
/// cluster is at least `threshold` percent similar, the first member with
/// a positive score is kept, falling back to the first ranked member when
/// nobody scored. Weaker clusters keep all their members.
pub fn select_representatives(cluster: &Cluster, threshold: f64) -> Result<Vec<String>, Error> {
    let mut members = cluster
        .members
        .iter()
        .map(|name| RankedMember::parse(name))
        .collect::<Result<Vec<_>, _>>()?;
    members.sort_by(RankedMember::by_score);

    if cluster.avg_similarity < threshold {
        return Ok(members.iter().map(|m| m.name.to_string()).collect());
    }

    let representative = members
        .iter()
        .find(|m| m.score > 0.0)
        .or_else(|| members.first());
    Ok(representative
        .map(|m| vec![m.name.to_string()])
        .unwrap_or_default())
}

/// Reduce `all_sources` to one submission per strongly similar cluster.
///
/// The result holds every source that belongs to no cluster plus the
/// representatives chosen by [`select_representatives`].
pub fn select_sources(
    all_sources: &BTreeSet<String>,
    clusters: &[Cluster],
    threshold: f64,
) -> Result<BTreeSet<String>, Error> {
    let mut clustered: BTreeSet<&str> = BTreeSet::new();
    let mut representatives: BTreeSet<String> = BTreeSet::new();

    for cluster in clusters {
        representatives.extend(select_representatives(cluster, threshold)?);
        clustered.extend(cluster.members.iter().map(String::as_str));
    }

    let unclustered = all_sources
        .iter()
        .filter(|source| !clustered.contains(source.as_str()))
        .cloned();
    let selected: BTreeSet<String> = unclustered.chain(representatives).collect();

    debug!(
        "Selected {} of {} sources ({} clustered)",
        selected.len(),
        all_sources.len(),
        clustered.len()
    );
    Ok(selected)
}

/// Keep clusters at least `threshold` percent similar that span more
/// than one group, annotated with the groups involved.
///
/// In grouped mode members are group ids and a single-group cluster is
/// still reported.
pub fn filter_clusters(
    clusters: &[Cluster],
    threshold: f64,
    mode: ComparisonMode,
) -> Result<Vec<SelectedCluster>, Error> {
    let mut selected = Vec::new();

    for cluster in clusters {
        let groups = member_groups(cluster, mode)?;
        if cluster.avg_similarity < threshold {
            continue;
        }
        if mode == ComparisonMode::Submissions && groups.len() < 2 {
            continue;
        }
        selected.push(SelectedCluster {
            cluster: cluster.clone(),
            groups: groups.into_iter().collect(),
        });
    }

    debug!(
        "{} of {} clusters reach {:.2}% similarity",
        selected.len(),
        clusters.len(),
        threshold
    );
    Ok(selected)
}

fn member_groups(cluster: &Cluster, mode: ComparisonMode) -> Result<BTreeSet<u64>, Error> {
    cluster
        .members
        .iter()
        .map(|name| match mode {
            ComparisonMode::Submissions => RankedMember::parse(name).map(|m| m.group_id),
            ComparisonMode::Grouped => parse_group_id(name),
        })
        .collect()
}
