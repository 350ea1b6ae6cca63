//! Decoding of the structured names JPlag gives to submissions and to
//! the comparison entries of its results archive.
//!
//! Submission token: `sub<gid>_<index>_<score|None>_<.ext>`.
//! Comparison entry: `<token>-<token>.json`.
//! Group pair entry: `<gid>-<gid>.json`.

use crate::error::{Error, GrammarKind};
use crate::model::ComparisonMode;
use std::str::FromStr;

const ENTRY_SUFFIX: &str = ".json";
const NO_SCORE: &str = "None";

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionToken {
    pub raw_name: String,
    pub group_id: u64,
    pub submission_index: u64,
    /// `None` when the detector recorded no score for this submission.
    pub score: Option<f64>,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRecord {
    pub first: SubmissionToken,
    pub second: SubmissionToken,
    pub raw_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPairToken {
    pub group_id1: u64,
    pub group_id2: u64,
    pub raw_name: String,
}

/// A decoded archive entry name, one variant per [`ComparisonMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonName {
    Submissions(ComparisonRecord),
    Groups(GroupPairToken),
}

impl ComparisonName {
    pub fn group_ids(&self) -> (u64, u64) {
        match self {
            ComparisonName::Submissions(rec) => (rec.first.group_id, rec.second.group_id),
            ComparisonName::Groups(pair) => (pair.group_id1, pair.group_id2),
        }
    }

    pub fn raw_name(&self) -> &str {
        match self {
            ComparisonName::Submissions(rec) => &rec.raw_name,
            ComparisonName::Groups(pair) => &pair.raw_name,
        }
    }

    /// Canonical unordered key, smaller group id first.
    pub fn pair_key(&self) -> (u64, u64) {
        let (a, b) = self.group_ids();
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// True for two submissions of the same group. Group pair entries
    /// never count as self comparisons.
    pub fn is_same_group(&self) -> bool {
        match self {
            ComparisonName::Submissions(rec) => rec.first.group_id == rec.second.group_id,
            ComparisonName::Groups(_) => false,
        }
    }
}

pub fn parse_submission(name: &str) -> Result<SubmissionToken, Error> {
    decode_submission(name).ok_or_else(|| Error::grammar(GrammarKind::SubmissionToken, name))
}

pub fn parse_comparison(name: &str) -> Result<ComparisonRecord, Error> {
    decode_comparison(name).ok_or_else(|| Error::grammar(GrammarKind::ComparisonName, name))
}

pub fn parse_group_pair(name: &str) -> Result<GroupPairToken, Error> {
    decode_group_pair(name).ok_or_else(|| Error::grammar(GrammarKind::GroupPairName, name))
}

pub fn parse_comparison_name(name: &str, mode: ComparisonMode) -> Result<ComparisonName, Error> {
    match mode {
        ComparisonMode::Submissions => parse_comparison(name).map(ComparisonName::Submissions),
        ComparisonMode::Grouped => parse_group_pair(name).map(ComparisonName::Groups),
    }
}

/// Parse a bare group id as used for cluster members in grouped mode.
pub fn parse_group_id(name: &str) -> Result<u64, Error> {
    let mut cursor = Cursor::new(name);
    cursor
        .number::<u64>()
        .filter(|_| cursor.is_empty())
        .ok_or_else(|| Error::grammar(GrammarKind::GroupId, name))
}

fn decode_submission(name: &str) -> Option<SubmissionToken> {
    let mut cursor = Cursor::new(name);
    cursor.eat("sub")?;
    let group_id = cursor.number::<u64>()?;
    cursor.eat("_")?;
    let submission_index = cursor.number::<u64>()?;
    cursor.eat("_")?;
    let score = match cursor.eat(NO_SCORE) {
        Some(()) => None,
        None => Some(cursor.decimal()?),
    };
    cursor.eat("_")?;

    let extension = cursor.remainder();
    if !extension.starts_with('.') || extension.len() < 2 {
        return None;
    }

    Some(SubmissionToken {
        raw_name: name.to_string(),
        group_id,
        submission_index,
        score,
        extension: extension.to_string(),
    })
}

fn decode_comparison(name: &str) -> Option<ComparisonRecord> {
    let body = name.strip_suffix(ENTRY_SUFFIX)?;

    // The extension of the first token may itself contain "-sub", so try
    // every boundary and take the last one where both halves decode.
    body.rmatch_indices("-sub").find_map(|(at, _)| {
        let first = decode_submission(&body[..at])?;
        let second = decode_submission(&body[at + 1..])?;
        Some(ComparisonRecord {
            first,
            second,
            raw_name: name.to_string(),
        })
    })
}

fn decode_group_pair(name: &str) -> Option<GroupPairToken> {
    let mut cursor = Cursor::new(name.strip_suffix(ENTRY_SUFFIX)?);
    let group_id1 = cursor.number::<u64>()?;
    cursor.eat("-")?;
    let group_id2 = cursor.number::<u64>()?;
    if !cursor.is_empty() {
        return None;
    }
    Some(GroupPairToken {
        group_id1,
        group_id2,
        raw_name: name.to_string(),
    })
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn eat(&mut self, literal: &str) -> Option<()> {
        self.rest = self.rest.strip_prefix(literal)?;
        Some(())
    }

    fn digits(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(digits)
    }

    fn number<T: FromStr>(&mut self) -> Option<T> {
        self.digits()?.parse().ok()
    }

    /// `\d+(\.\d+)?`
    fn decimal(&mut self) -> Option<f64> {
        let start = self.rest;
        let int_len = self.digits()?.len();
        let mut len = int_len;
        if let Some(after_dot) = self.rest.strip_prefix('.') {
            if after_dot.starts_with(|c: char| c.is_ascii_digit()) {
                self.rest = after_dot;
                len += 1 + self.digits()?.len();
            }
        }
        start[..len].parse().ok()
    }

    fn remainder(&mut self) -> &'a str {
        std::mem::take(&mut self.rest)
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}
