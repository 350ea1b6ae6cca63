pub mod archive;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod filename;
pub mod listing;
pub mod log;
pub mod model;
pub mod pairs;
pub mod progress;
pub mod report;

pub use config::AppConfig;
pub use engine::{ReportEngine, ReportOptions, ReportResult};
pub use error::Error;
pub use model::{Cluster, ComparisonMode, GroupPairSimilarity, SelectedCluster, Threshold};
pub use progress::{ProgressReporter, SilentReporter};
