use crate::config::resolve_path;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Clone)]
pub struct StorageConfig {
    /// directory uploaded photos are written to, created on demand
    pub upload_dir: String,
    /// sqlite database file
    pub database: String,
}

impl StorageConfig {
    pub fn upload_dir(&self) -> PathBuf {
        resolve_path(&self.upload_dir)
    }
    pub fn database_path(&self) -> PathBuf {
        resolve_path(&self.database)
    }
}
