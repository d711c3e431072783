use crate::models::AnalysisResult;
use serde::Deserialize;

/// Body returned by the analysis service.
///
/// An empty object means nothing was detected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponseDto {
    #[serde(default)]
    pub object_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl AnalysisResponseDto {
    /// Returns a result only when a non-empty label was reported.
    pub fn into_result(self) -> Option<AnalysisResult> {
        let label = self.object_name?;
        if label.trim().is_empty() {
            return None;
        }
        Some(AnalysisResult {
            label,
            confidence: self.confidence,
        })
    }
}
