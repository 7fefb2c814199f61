pub mod a001_product;
pub mod a002_marketplace_config;
pub mod ai_analyze;
pub mod u501_export;

use axum::{http::StatusCode, Json};
use serde_json::json;

pub type ApiError = (StatusCode, Json<serde_json::Value>);

/// Ответ с телом `{ "error": message }`
pub fn error_response(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

/// Ошибка сервиса: валидация даёт 400, остальное 500
pub fn service_error(context: &str, e: anyhow::Error) -> ApiError {
    if crate::shared::error::is_validation(&e) {
        tracing::warn!("{}: {}", context, e);
        error_response(StatusCode::BAD_REQUEST, e)
    } else {
        tracing::error!("{}: {:#}", context, e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
    }
}
