use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Debug, Clone)]
pub struct AnalysisConfig {
    pub url: String,
    pub timeout_secs: Option<u64>,
}

impl AnalysisConfig {
    /// Upper bound of one analysis request, 30 seconds when not configured.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}
