use axum::{http::StatusCode, Json};
use contracts::domain::a001_product::{NewProductDto, Product};

use super::{service_error, ApiError};
use crate::domain::a001_product;

/// GET /api/products
pub async fn list_all() -> Result<Json<Vec<Product>>, ApiError> {
    a001_product::service::list_all()
        .await
        .map(Json)
        .map_err(|e| service_error("Failed to list products", e))
}

/// POST /api/products
pub async fn create(
    Json(dto): Json<NewProductDto>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    tracing::debug!("Creating product: name={:?}", dto.name);
    match a001_product::service::create(dto).await {
        Ok(product) => Ok((StatusCode::CREATED, Json(product))),
        Err(e) => Err(service_error("Failed to create product", e)),
    }
}
