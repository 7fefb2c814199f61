use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Product handlers
        .route(
            "/api/products",
            get(handlers::a001_product::list_all).post(handlers::a001_product::create),
        )
        // A002 Marketplace config handlers
        .route(
            "/api/marketplaces/config",
            get(handlers::a002_marketplace_config::list_all)
                .post(handlers::a002_marketplace_config::upsert),
        )
        // UseCase u501: Export to marketplaces
        .route("/api/export", post(handlers::u501_export::export))
        // AI product analysis
        .route("/api/ai/analyze", post(handlers::ai_analyze::analyze))
}
