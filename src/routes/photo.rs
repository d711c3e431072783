use crate::common::{ApiResult, AppError};
use crate::services::{UploadPhotoArgs, UploadedImage};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::IntoResponse;

const SERIAL_NUMBER_FIELD: &str = "serialNumber";
const IMAGE_FIELD: &str = "imageFile";

fn malformed(err: MultipartError) -> AppError {
    AppError::bad_request(err.body_text())
}

/// Upload a photo taken by a registered device
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut args = UploadPhotoArgs::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some(SERIAL_NUMBER_FIELD) => {
                args.serial_number = Some(field.text().await.map_err(malformed)?);
            }
            Some(IMAGE_FIELD) => {
                let file_name = field.file_name().map(ToString::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                args.image = Some(UploadedImage { file_name, bytes });
            }
            _ => tracing::debug!(field = ?name, "Ignore unknown multipart field"),
        }
    }
    let photo = state.photo_service.upload(args).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// The most recently saved photo
pub async fn latest(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.photo_service.find_latest().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.photo_service.find_by_id(id).await?))
}
