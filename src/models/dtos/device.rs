use crate::models::{DeviceEntity, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceDto {
    pub serial_number: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponseDto {
    pub serial_number: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
}

impl From<DeviceEntity> for DeviceResponseDto {
    fn from(value: DeviceEntity) -> Self {
        Self {
            serial_number: value.serial_number,
            name: value.name,
            created_at: value.timestamps.created_at,
        }
    }
}
