use std::fmt;
use thiserror::Error;

/// What a piece of input was expected to look like when it failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarKind {
    SubmissionToken,
    ComparisonName,
    GroupPairName,
    GroupId,
    ClusterLine,
    ReportLine,
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrammarKind::SubmissionToken => "submission token",
            GrammarKind::ComparisonName => "comparison file name",
            GrammarKind::GroupPairName => "group pair file name",
            GrammarKind::GroupId => "group id",
            GrammarKind::ClusterLine => "cluster log line",
            GrammarKind::ReportLine => "report line",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed {kind}: '{input}'")]
    Grammar { kind: GrammarKind, input: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn grammar(kind: GrammarKind, input: impl Into<String>) -> Self {
        Error::Grammar {
            kind,
            input: input.into(),
        }
    }
}
