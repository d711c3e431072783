use crate::common::ApiResult;
use crate::models::dtos::device::{DeviceResponseDto, RegisterDeviceDto};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterDeviceDto>,
) -> ApiResult<impl IntoResponse> {
    let device = state
        .device_service
        .register(&body.serial_number, body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(DeviceResponseDto::from(device))))
}
