use contracts::domain::a002_marketplace_config::{MarketplaceConfig, MarketplaceConfigId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_marketplace_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub shop_id: Option<String>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for MarketplaceConfig {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("Invalid marketplace config id '{}': {}", m.id, e))?;

        Ok(MarketplaceConfig {
            id: MarketplaceConfigId(uuid),
            name: m.name,
            access_token: m.access_token,
            refresh_token: m.refresh_token,
            shop_id: m.shop_id,
            expires_at: m.expires_at,
            updated_at: m.updated_at,
        })
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(config: &MarketplaceConfig) -> ActiveModel {
    ActiveModel {
        id: Set(config.id.value().to_string()),
        name: Set(config.name.clone()),
        access_token: Set(config.access_token.clone()),
        refresh_token: Set(config.refresh_token.clone()),
        shop_id: Set(config.shop_id.clone()),
        expires_at: Set(config.expires_at),
        updated_at: Set(config.updated_at),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<MarketplaceConfig>> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(conn())
        .await?
        .into_iter()
        .filter_map(|m| match MarketplaceConfig::try_from(m) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::error!("Skipping corrupt a002_marketplace_config row: {}", e);
                None
            }
        })
        .collect();
    Ok(items)
}

pub async fn get_by_name(name: &str) -> anyhow::Result<Option<MarketplaceConfig>> {
    Entity::find()
        .filter(Column::Name.eq(name))
        .one(conn())
        .await?
        .map(MarketplaceConfig::try_from)
        .transpose()
}

/// INSERT ... ON CONFLICT(name) DO UPDATE: одна строка на имя даже при
/// одновременных сохранениях. Существующая строка сохраняет свой id.
pub async fn upsert_by_name(config: &MarketplaceConfig) -> anyhow::Result<()> {
    Entity::insert(to_active(config))
        .on_conflict(
            OnConflict::column(Column::Name)
                .update_columns([
                    Column::AccessToken,
                    Column::RefreshToken,
                    Column::ShopId,
                    Column::ExpiresAt,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn())
        .await?;
    Ok(())
}
