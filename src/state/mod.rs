use crate::config::Config;
use crate::services::{
    DefaultPhotoService, DeviceService, HttpAnalysisClient, PhotoService, SqlitePhotoRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub device_service: Arc<DeviceService>,
    pub photo_service: Arc<DefaultPhotoService>,
}

impl AppState {
    pub fn build(pool: SqlitePool, config: &Config) -> anyhow::Result<Self> {
        let device_service = Arc::new(DeviceService::new(pool.clone()));
        let photo_service = Arc::new(PhotoService::new(
            device_service.clone(),
            SqlitePhotoRepository::new(pool),
            HttpAnalysisClient::new(&config.analysis)?,
            config.storage.upload_dir(),
        ));
        Ok(Self {
            device_service,
            photo_service,
        })
    }
}
