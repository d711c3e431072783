use crate::common::{ApiResult, AppError};
use crate::models::{DeviceEntity, Timestamps};
use sqlx::SqlitePool;
use std::future::Future;

/// Lookup of registered devices by serial number.
pub trait DeviceRegistry: Send + Sync + 'static {
    fn find_by_serial(
        &self,
        serial_number: &str,
    ) -> impl Future<Output = Result<Option<DeviceEntity>, sqlx::Error>> + Send;
}

pub struct DeviceService {
    pool: SqlitePool,
}

impl DeviceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn register(
        &self,
        serial_number: &str,
        name: Option<String>,
    ) -> ApiResult<DeviceEntity> {
        let serial_number = serial_number.trim();
        if serial_number.is_empty() {
            return Err(AppError::bad_request("A device serial number is required."));
        }
        let timestamps = Timestamps::now();
        let result = sqlx::query(
            "INSERT INTO devices (serial_number, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(serial_number)
        .bind(&name)
        .bind(timestamps.created_at)
        .bind(timestamps.updated_at)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => {
                tracing::info!(serial_number, "Registered device");
                Ok(DeviceEntity {
                    serial_number: serial_number.to_string(),
                    name,
                    timestamps,
                })
            }
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Err(
                AppError::Conflict(format!("Device '{serial_number}' is already registered.")),
            ),
            Err(err) => Err(err.into()),
        }
    }
}

impl DeviceRegistry for DeviceService {
    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            "SELECT serial_number, name, created_at, updated_at FROM devices WHERE serial_number = ?",
        )
        .bind(serial_number)
        .fetch_optional(&self.pool)
        .await
    }
}
