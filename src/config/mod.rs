use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod analysis_config;
mod logs_config;
mod server_config;
mod storage_config;

pub use analysis_config::AnalysisConfig;
pub use logs_config::LogsConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;

/// Extra time a writer waits for the database lock beyond one analysis request.
const LOCK_WAIT_MARGIN: Duration = Duration::from_secs(10);

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
    pub logs: LogsConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).with_context(|| {
            "Error: Failed to parse configuration file.\n\
            Please check the file syntax is valid TOML syntax"
        })
    }

    /// How long a connection waits on a locked database before failing.
    ///
    /// An upload keeps its write transaction open across the analysis request,
    /// so the wait must outlast the analysis timeout.
    pub fn database_busy_timeout(&self) -> Duration {
        self.analysis.timeout() + LOCK_WAIT_MARGIN
    }
}

/// Resolves `path` against the current working directory when it is relative.
pub(crate) fn resolve_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(dir) => dir.join(path),
        Err(_) => path.to_path_buf(),
    }
}

fn parse_config_path<I>(mut args: I) -> anyhow::Result<PathBuf>
where
    I: Iterator<Item = String>,
{
    args.next();
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            return match args.next() {
                Some(path) => Ok(PathBuf::from(path)),
                None => Err(anyhow!("Error: Please specify path string for -c argument.")),
            };
        }
    }
    Err(anyhow!(
        "Error: Please specify configuration file argument. Usage: -c <config_file>"
    ))
}

pub fn load() -> anyhow::Result<Config> {
    let path = parse_config_path(std::env::args())?;
    if !path.is_file() {
        return Err(anyhow!(
            "Error: Configuration file not found or invalid.\n\
        Please make sure that the configuration file exists and is a valid TOML file.\n\
        Expected file path: {:?}",
            path
        ));
    }
    let content = std::fs::read_to_string(&path).with_context(|| {
        "Error: Failed to read configuration file.\n\
        Please check the file path and file permissions, and make sure the file is valid accessible"
    })?;
    Config::from_toml(&content)
}
