use crate::models::PhotoEntity;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponseDto {
    pub id: i64,
    pub file_name: String,
    pub analysis_result: Option<String>,
    pub confidence: Option<f64>,
}

impl From<PhotoEntity> for PhotoResponseDto {
    fn from(value: PhotoEntity) -> Self {
        Self {
            id: value.id,
            file_name: value.file_name,
            analysis_result: value.analysis_result,
            confidence: value.confidence,
        }
    }
}
