use axum::{http::StatusCode, Json};
use contracts::usecases::u501_export_to_marketplaces::ExportResponse;
use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::{error_response, ApiError};
use crate::usecases::u501_export_to_marketplaces::ExportExecutor;

static EXPORT_EXECUTOR: OnceCell<Arc<ExportExecutor>> = OnceCell::new();

/// Регистрируется один раз при старте, после загрузки конфигурации
pub fn init_executor(executor: ExportExecutor) -> anyhow::Result<()> {
    EXPORT_EXECUTOR
        .set(Arc::new(executor))
        .map_err(|_| anyhow::anyhow!("Export executor already initialized"))
}

/// POST /api/export
pub async fn export() -> Result<Json<ExportResponse>, ApiError> {
    let Some(executor) = EXPORT_EXECUTOR.get() else {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Export executor is not initialized",
        ));
    };

    match executor.run_export().await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Export error: {:#}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}
