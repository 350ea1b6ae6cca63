//! Cross-group listing of a plain-text JPlag report, where each
//! comparison reads `Comparing <sub>-<sub>: <similarity>`.

use crate::error::{Error, GrammarKind};
use crate::filename::{parse_submission, SubmissionToken};
use std::fmt;

const LINE_PREFIX: &str = "Comparing ";

#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub first: SubmissionToken,
    pub second: SubmissionToken,
    /// Similarity exactly as printed in the report.
    pub similarity: String,
}

impl GroupComparison {
    pub fn is_cross_group(&self) -> bool {
        self.first.group_id != self.second.group_id
    }
}

impl fmt::Display for GroupComparison {
    /// `10 (3@40.0) -> 11 (22@100.0): 4.9800797`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            Endpoint(&self.first),
            Endpoint(&self.second),
            self.similarity
        )
    }
}

struct Endpoint<'a>(&'a SubmissionToken);

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = self.0;
        write!(f, "{} ({}@", token.group_id, token.submission_index)?;
        match token.score {
            Some(score) => write!(f, "{:?})", score),
            None => write!(f, "None)"),
        }
    }
}

/// Parse one report line. Lines that are not comparisons yield `None`;
/// a comparison naming something other than two submissions is an error.
pub fn parse_report_line(line: &str) -> Result<Option<GroupComparison>, Error> {
    let Some((names, similarity)) = split_line(line.trim()) else {
        return Ok(None);
    };
    let (first, second) = names
        .split_once('-')
        .ok_or_else(|| Error::grammar(GrammarKind::ReportLine, line))?;

    Ok(Some(GroupComparison {
        first: parse_submission(first)?,
        second: parse_submission(second)?,
        similarity: similarity.to_string(),
    }))
}

/// Every comparison between two different groups, in report order.
pub fn list_cross_group<I, S>(lines: I) -> Result<Vec<GroupComparison>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut listed = Vec::new();
    for line in lines {
        if let Some(comparison) = parse_report_line(line.as_ref())? {
            if comparison.is_cross_group() {
                listed.push(comparison);
            }
        }
    }
    Ok(listed)
}

/// `Comparing <names>: <digits>.<digits>` with anything after the number allowed.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(LINE_PREFIX)?;
    let (names, tail) = rest.split_once(": ")?;
    if !names.contains('-') {
        return None;
    }

    let int_len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
    let after_dot = tail[int_len..].strip_prefix('.')?;
    let frac_len = after_dot
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_dot.len());
    if int_len == 0 || frac_len == 0 {
        return None;
    }
    Some((names, &tail[..int_len + 1 + frac_len]))
}
