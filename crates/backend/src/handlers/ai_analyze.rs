use axum::{http::StatusCode, Json};
use contracts::shared::product_analysis::{AnalyzeProductRequest, ProductSuggestion};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::{error_response, ApiError};
use crate::shared::llm::product_analyzer::ProductAnalyzer;

const REQUIRED_FIELDS_MESSAGE: &str = "Name and imageUrl are required";

static PRODUCT_ANALYZER: OnceCell<Arc<ProductAnalyzer>> = OnceCell::new();

pub fn init_analyzer(analyzer: ProductAnalyzer) -> anyhow::Result<()> {
    PRODUCT_ANALYZER
        .set(Arc::new(analyzer))
        .map_err(|_| anyhow::anyhow!("Product analyzer already initialized"))
}

/// POST /api/ai/analyze
pub async fn analyze(
    Json(request): Json<AnalyzeProductRequest>,
) -> Result<Json<ProductSuggestion>, ApiError> {
    let Some((name, image_url)) = request.required_fields() else {
        return Err(error_response(StatusCode::BAD_REQUEST, REQUIRED_FIELDS_MESSAGE));
    };

    // Без ключа анализатор не создаётся при старте
    let Some(analyzer) = PRODUCT_ANALYZER.get() else {
        tracing::error!("AI analysis requested but no API key is configured");
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "AI analysis is not configured",
        ));
    };

    match analyzer.analyze(name, image_url).await {
        Ok(suggestion) => Ok(Json(suggestion)),
        Err(e) => {
            tracing::error!("AI analysis error: {}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, e))
        }
    }
}
