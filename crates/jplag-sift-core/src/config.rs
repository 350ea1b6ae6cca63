use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};

use crate::model::Threshold;

/// Scale of the similarities stored in the results archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityScale {
    /// 0.0 - 1.0, as written by JPlag.
    #[default]
    Fraction,
    /// 0 - 100
    Percent,
}

impl SimilarityScale {
    pub fn apply(self, threshold: Threshold) -> f64 {
        match self {
            SimilarityScale::Fraction => threshold.fraction(),
            SimilarityScale::Percent => threshold.percent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Minimum average similarity (percent) for a cluster to be reported.
    pub cluster_threshold: f64,
    /// Minimum average similarity (percent) for a cluster to be reduced
    /// to one representative.
    pub select_threshold: f64,
    pub pair_scale: SimilarityScale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cluster_threshold: 50.0,
            select_threshold: 90.0,
            pair_scale: SimilarityScale::Fraction,
        }
    }
}

/// Load `Config.*` from the working directory when present, then
/// `SIFT_*` environment overrides (e.g. `SIFT_CLUSTER_THRESHOLD=60`).
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("SIFT").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::builder().build().unwrap();
        let app: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app.cluster_threshold, 50.0);
        assert_eq!(app.select_threshold, 90.0);
        assert_eq!(app.pair_scale, SimilarityScale::Fraction);
    }

    #[test]
    fn test_partial_file_overrides() {
        let config = Config::builder()
            .add_source(config::File::from_str(
                "cluster_threshold = 75.0\npair_scale = \"percent\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let app: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app.cluster_threshold, 75.0);
        assert_eq!(app.select_threshold, 90.0);
        assert_eq!(app.pair_scale, SimilarityScale::Percent);
    }

    #[test]
    fn test_scale_applies_threshold() {
        let threshold = Threshold::new(0.25);
        assert_eq!(SimilarityScale::Fraction.apply(threshold), 0.25);
        assert_eq!(SimilarityScale::Percent.apply(threshold), 25.0);
    }
}
