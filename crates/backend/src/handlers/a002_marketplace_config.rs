use axum::Json;
use contracts::domain::a002_marketplace_config::{MarketplaceConfig, MarketplaceConfigDto};

use super::{service_error, ApiError};
use crate::domain::a002_marketplace_config;

/// GET /api/marketplaces/config
pub async fn list_all() -> Result<Json<Vec<MarketplaceConfig>>, ApiError> {
    a002_marketplace_config::service::list_all()
        .await
        .map(Json)
        .map_err(|e| service_error("Failed to list marketplace configs", e))
}

/// POST /api/marketplaces/config
pub async fn upsert(
    Json(dto): Json<MarketplaceConfigDto>,
) -> Result<Json<MarketplaceConfig>, ApiError> {
    a002_marketplace_config::service::upsert(dto)
        .await
        .map(Json)
        .map_err(|e| service_error("Failed to save marketplace config", e))
}
