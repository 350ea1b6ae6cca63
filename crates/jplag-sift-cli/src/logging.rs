use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_FILE: &str = "./logs/jplag-sift.log";

/// Where and how much to log, from `TRACING_LEVEL` and `LOG_FILE_PATH`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: String,
    pub file_path: PathBuf,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            level: env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string()),
            file_path: env::var("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }

    /// Directory and file name for the appender. A bare file name logs
    /// into the working directory.
    fn file_parts(&self) -> (PathBuf, PathBuf) {
        let dir = match self.file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = self
            .file_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("jplag-sift.log"));
        (dir, name)
    }
}

/// Console logs go to stderr so that stdout only carries command output
/// (`select` paths, `list-groups` lines). The file layer gets everything
/// the filter lets through, without colours.
pub fn init_logger(settings: &LogSettings) -> impl Drop {
    let (filter_layer, bad_level) = match EnvFilter::try_new(&settings.level) {
        Ok(filter) => (filter, None),
        Err(_) => (EnvFilter::new(DEFAULT_LEVEL), Some(settings.level.as_str())),
    };

    let (dir, name) = settings.file_parts();
    let file_appender = tracing_appender::rolling::never(&dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(filter_layer)
        .init();

    if let Some(level) = bad_level {
        warn!("Ignoring invalid TRACING_LEVEL {:?}, using {}", level, DEFAULT_LEVEL);
    }
    debug!("Logging to stderr and {}", log_location(&dir, &settings.file_path));

    guard
}

fn log_location(dir: &Path, file_path: &Path) -> String {
    match file_path.file_name() {
        Some(name) => dir.join(name).display().to_string(),
        None => file_path.display().to_string(),
    }
}
