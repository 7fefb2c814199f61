use super::repository;
use crate::shared::error::validation;
use contracts::domain::a001_product::{NewProductDto, Product, ProductId, ProductStatus};

/// Создание товара из формы добавления. Новый товар всегда `pending`.
pub async fn create(dto: NewProductDto) -> anyhow::Result<Product> {
    let product = dto.into_product();
    product.validate().map_err(validation)?;

    repository::insert(&product).await?;
    tracing::info!("Product {} created: {}", product.id, product.name);
    Ok(product)
}

pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    repository::list_all().await
}

pub async fn list_pending() -> anyhow::Result<Vec<Product>> {
    repository::list_by_status(ProductStatus::Pending).await
}

/// Отметить товар выгруженным. Обратного перехода нет.
pub async fn mark_exported(id: ProductId) -> anyhow::Result<()> {
    let updated =
        repository::set_status(id, ProductStatus::Pending, ProductStatus::Exported).await?;
    if !updated {
        anyhow::bail!("Product {} is not pending", id);
    }
    Ok(())
}
