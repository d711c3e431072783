use crate::models::Timestamps;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PhotoEntity {
    pub id: i64,
    pub device_serial: String,
    pub file_path: String,
    pub file_name: String,
    /// label reported by the analysis service, e.g. "bug"
    pub analysis_result: Option<String>,
    /// 0.0 - 1.0
    pub confidence: Option<f64>,
    #[sqlx(flatten)]
    pub timestamps: Timestamps,
}

impl PhotoEntity {
    pub fn update_analysis(&mut self, result: AnalysisResult) {
        self.analysis_result = Some(result.label);
        self.confidence = result.confidence;
        self.timestamps.touch();
    }
}

/// Row to insert, the id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub device_serial: String,
    pub file_path: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub label: String,
    pub confidence: Option<f64>,
}
