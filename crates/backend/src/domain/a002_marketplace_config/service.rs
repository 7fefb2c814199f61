use super::repository;
use crate::shared::error::validation;
use contracts::domain::a002_marketplace_config::{MarketplaceConfig, MarketplaceConfigDto};

/// Upsert по имени маркетплейса: одна запись на маркетплейс.
/// Поля, которых нет в запросе, сохраняют прежние значения.
pub async fn upsert(dto: MarketplaceConfigDto) -> anyhow::Result<MarketplaceConfig> {
    let name = dto.validated_name().map_err(validation)?;

    let existing = repository::get_by_name(&name).await?;
    let is_new = existing.is_none();
    let mut config =
        existing.unwrap_or_else(|| MarketplaceConfig::new(name.clone(), String::new()));
    config.apply(&dto).map_err(validation)?;

    repository::upsert_by_name(&config).await?;
    tracing::info!(
        "Marketplace config '{}' {}",
        name,
        if is_new { "created" } else { "updated" }
    );

    // При гонке первых сохранений в базе остаётся id первой записи
    repository::get_by_name(&name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Marketplace config '{}' vanished after upsert", name))
}

pub async fn list_all() -> anyhow::Result<Vec<MarketplaceConfig>> {
    repository::list_all().await
}
