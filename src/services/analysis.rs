use crate::config::AnalysisConfig;
use crate::models::AnalysisResult;
use crate::models::dtos::analysis::AnalysisResponseDto;
use anyhow::Context;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Multipart field the analysis server reads the image from.
const FILE_FIELD: &str = "file";

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read image {path:?} for analysis")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to reach analysis server")]
    Transport(#[source] reqwest::Error),
    #[error("Analysis server responded with status {0}")]
    Status(StatusCode),
    #[error("Failed to decode analysis server response")]
    Decode(#[source] reqwest::Error),
}

/// Classifies a stored image.
///
/// `Ok(None)` means the analysis succeeded but reported no usable label.
pub trait Analyzer: Send + Sync + 'static {
    fn analyze(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<Option<AnalysisResult>, AnalysisError>> + Send;
}

pub struct HttpAnalysisClient {
    client: reqwest::Client,
    url: String,
}

impl HttpAnalysisClient {
    pub fn new(config: &AnalysisConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build analysis http client")?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl Analyzer for HttpAnalysisClient {
    async fn analyze(&self, path: &Path) -> Result<Option<AnalysisResult>, AnalysisError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AnalysisError::ReadImage {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|it| it.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_FIELD.to_string());
        let form = Form::new().part(FILE_FIELD, Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(AnalysisError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Status(status));
        }
        let body = response
            .json::<AnalysisResponseDto>()
            .await
            .map_err(AnalysisError::Decode)?;
        tracing::debug!(?body, "Analysis server responded");
        Ok(body.into_result())
    }
}
