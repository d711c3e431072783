use serde::Deserialize;

const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// request body limit in bytes
    pub body_limit: Option<usize>,
}

impl ServerConfig {
    pub fn body_limit(&self) -> usize {
        self.body_limit.unwrap_or(DEFAULT_BODY_LIMIT)
    }
}
