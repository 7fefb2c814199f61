use async_trait::async_trait;
use contracts::domain::a001_product::{Product, ProductId};
use contracts::domain::a002_marketplace_config::MarketplaceConfig;

use crate::domain::{a001_product, a002_marketplace_config};

/// Хранилище, из которого выгрузка читает товары и настройки
#[async_trait]
pub trait ExportStore: Send + Sync {
    /// Товары в статусе `pending`
    async fn pending_products(&self) -> anyhow::Result<Vec<Product>>;

    async fn marketplace_configs(&self) -> anyhow::Result<Vec<MarketplaceConfig>>;

    /// Перевести товар в `exported`
    async fn mark_exported(&self, id: ProductId) -> anyhow::Result<()>;
}

/// Хранилище поверх SQLite
pub struct DbExportStore;

#[async_trait]
impl ExportStore for DbExportStore {
    async fn pending_products(&self) -> anyhow::Result<Vec<Product>> {
        a001_product::service::list_pending().await
    }

    async fn marketplace_configs(&self) -> anyhow::Result<Vec<MarketplaceConfig>> {
        a002_marketplace_config::service::list_all().await
    }

    async fn mark_exported(&self, id: ProductId) -> anyhow::Result<()> {
        a001_product::service::mark_exported(id).await
    }
}
