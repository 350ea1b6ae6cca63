//! Reading cluster reports out of a JPlag log.
//!
//! Only `ClusteringFactory` lines are looked at:
//!
//! ```text
//! <prefix> [main] [INFO] ClusteringFactory - 2 clusters were found:
//! <prefix> [main] [INFO] ClusteringFactory -  cluster strength: 0.25, avg similarity: 95.5%, members: [a, b]
//! ```

use crate::error::{Error, GrammarKind};
use crate::model::Cluster;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

const SIGNATURE: &str = " [main] [INFO] ClusteringFactory - ";
const COUNT_SUFFIX: &str = " clusters were found:";
const STRENGTH_PREFIX: &str = " cluster strength: ";
const SIMILARITY_PREFIX: &str = ", avg similarity: ";
const MEMBERS_PREFIX: &str = "%, members: [";

/// Classification of a single log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine {
    /// Not a `ClusteringFactory` line.
    Ignored,
    /// Announces how many clusters follow.
    ClusterCount(usize),
    ClusterDetail(Cluster),
    /// A `ClusteringFactory` line of some other kind.
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    /// Cluster count announced by the log, if any. Informational only.
    pub announced: Option<usize>,
    /// Clusters in the order their detail lines appear.
    pub clusters: Vec<Cluster>,
}

pub fn parse_line(line: &str) -> Result<LogLine, Error> {
    let line = line.trim();
    let rest = match line.find(SIGNATURE) {
        Some(at) if at > 0 => &line[at + SIGNATURE.len()..],
        _ => return Ok(LogLine::Ignored),
    };
    if rest.is_empty() {
        return Ok(LogLine::Ignored);
    }

    if let Some(count) = parse_count(rest) {
        return Ok(LogLine::ClusterCount(count));
    }

    match split_detail(rest) {
        Some(fields) => fields.into_cluster(line).map(LogLine::ClusterDetail),
        None => Ok(LogLine::Unrecognized),
    }
}

pub fn parse_log<I, S>(lines: I) -> Result<ParsedLog, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedLog::default();
    for line in lines {
        match parse_line(line.as_ref())? {
            LogLine::ClusterCount(count) => parsed.announced = Some(count),
            LogLine::ClusterDetail(cluster) => parsed.clusters.push(cluster),
            LogLine::Unrecognized => trace!("Skipping clustering line: {}", line.as_ref()),
            LogLine::Ignored => {}
        }
    }
    Ok(parsed)
}

pub fn read_log(path: &Path) -> Result<ParsedLog, Error> {
    let text = fs::read_to_string(path)?;
    let parsed = parse_log(text.lines())?;
    debug!(
        "Parsed {} clusters from {} (log announced {:?})",
        parsed.clusters.len(),
        path.display(),
        parsed.announced
    );
    Ok(parsed)
}

fn parse_count(rest: &str) -> Option<usize> {
    let digits = rest.strip_suffix(COUNT_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

struct DetailFields<'a> {
    strength: &'a str,
    avg_similarity: &'a str,
    members: &'a str,
}

impl DetailFields<'_> {
    fn into_cluster(self, line: &str) -> Result<Cluster, Error> {
        let number = |text: &str| {
            text.parse::<f64>()
                .map_err(|_| Error::grammar(GrammarKind::ClusterLine, line))
        };
        let members: BTreeSet<String> = self
            .members
            .trim()
            .split(',')
            .map(|member| member.trim().to_string())
            .collect();

        Ok(Cluster {
            strength: number(self.strength)?,
            avg_similarity: number(self.avg_similarity)?,
            members,
        })
    }
}

fn split_detail(rest: &str) -> Option<DetailFields<'_>> {
    let rest = rest.strip_prefix(STRENGTH_PREFIX)?;
    let (strength, rest) = rest.split_once(SIMILARITY_PREFIX)?;
    let (avg_similarity, rest) = rest.split_once(MEMBERS_PREFIX)?;
    let members = rest.strip_suffix(']')?;

    if !is_number_token(strength) || !is_number_token(avg_similarity) || members.is_empty() {
        return None;
    }
    Some(DetailFields {
        strength,
        avg_similarity,
        members,
    })
}

/// `[0-9.E-]+`
fn is_number_token(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'E' | b'-'))
}
