use crate::common::{ApiResult, AppError, InternalError};
use crate::models::dtos::photo::PhotoResponseDto;
use crate::models::{DeviceEntity, NewPhoto, PhotoEntity};
use crate::services::analysis::Analyzer;
use crate::services::device::DeviceRegistry;
use crate::services::photo_repository::{PhotoRepository, PhotoTransaction};
use crate::utils::generate_file_name;
use anyhow::Context;
use axum::body::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Image part of an upload request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// name reported by the client, only its extension is kept
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct UploadPhotoArgs {
    pub serial_number: Option<String>,
    pub image: Option<UploadedImage>,
}

pub struct PhotoService<R, P, A> {
    devices: Arc<R>,
    photos: P,
    analyzer: A,
    upload_dir: PathBuf,
}

impl<R, P, A> PhotoService<R, P, A>
where
    R: DeviceRegistry,
    P: PhotoRepository,
    A: Analyzer,
{
    pub fn new(devices: Arc<R>, photos: P, analyzer: A, upload_dir: PathBuf) -> Self {
        Self {
            devices,
            photos,
            analyzer,
            upload_dir,
        }
    }

    /// Stores an uploaded photo and enriches it with the analysis result when
    /// the analysis server provides one.
    ///
    /// Only a missing image, a missing serial number or an unknown device fail
    /// the request before anything is written. Analysis failures are logged
    /// and never reported to the caller.
    pub async fn upload(&self, args: UploadPhotoArgs) -> ApiResult<PhotoResponseDto> {
        let image = match args.image {
            Some(image) if !image.bytes.is_empty() => image,
            _ => return Err(AppError::bad_request("An image file is required.")),
        };
        let serial_number = args
            .serial_number
            .map(|it| it.trim().to_string())
            .filter(|it| !it.is_empty())
            .ok_or_else(|| AppError::bad_request("A device serial number is required."))?;
        let device = self
            .devices
            .find_by_serial(&serial_number)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Unregistered device: {serial_number}")))?;

        fs::create_dir_all(&self.upload_dir)
            .await
            .with_context(|| InternalError::CreateDirectoryError {
                path: self.upload_dir.clone(),
            })?;
        let file_name = generate_file_name(image.file_name.as_deref(), &chrono::Local::now());
        let path = self.upload_dir.join(&file_name);
        fs::write(&path, &image.bytes)
            .await
            .with_context(|| InternalError::WriteFileError { path: path.clone() })?;
        tracing::debug!(
            serial_number = %device.serial_number,
            size = image.bytes.len(),
            "Stored upload at {:?}",
            path
        );

        match self.persist(&device, &path, file_name).await {
            Ok(photo) => Ok(photo.into()),
            Err(err) => {
                cleanup(&path).await;
                Err(err
                    .context(InternalError::PersistRecordError { path })
                    .into())
            }
        }
    }

    /// Inserts the record and applies the analysis result in one transaction.
    async fn persist(
        &self,
        device: &DeviceEntity,
        path: &Path,
        file_name: String,
    ) -> anyhow::Result<PhotoEntity> {
        let mut tx = self.photos.begin().await?;
        let mut photo = tx
            .insert(NewPhoto {
                device_serial: device.serial_number.clone(),
                file_path: path.to_string_lossy().into_owned(),
                file_name,
            })
            .await?;
        // analysis failures must not roll back the insert
        match self.analyzer.analyze(path).await {
            Ok(Some(result)) => {
                tracing::info!(
                    photo_id = photo.id,
                    label = %result.label,
                    confidence = ?result.confidence,
                    "Photo analysed"
                );
                photo.update_analysis(result);
                tx.save(&photo).await?;
            }
            Ok(None) => tracing::info!(photo_id = photo.id, "Analysis reported no object"),
            Err(err) => tracing::warn!(
                photo_id = photo.id,
                "Analysis request failed: {:#}",
                anyhow::Error::new(err)
            ),
        }
        tx.commit().await?;
        Ok(photo)
    }

    pub async fn find_latest(&self) -> ApiResult<PhotoResponseDto> {
        self.photos
            .find_latest()
            .await?
            .map(PhotoResponseDto::from)
            .ok_or_else(|| AppError::not_found("No photo has been saved yet."))
    }

    pub async fn find_by_id(&self, id: i64) -> ApiResult<PhotoResponseDto> {
        self.photos
            .find_by_id(id)
            .await?
            .map(PhotoResponseDto::from)
            .ok_or_else(|| AppError::not_found(format!("Photo {id} not found.")))
    }
}

async fn cleanup(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        tracing::warn!(
            %err,
            "{}",
            InternalError::CleanupFileError {
                path: path.to_path_buf()
            }
        );
    }
}
