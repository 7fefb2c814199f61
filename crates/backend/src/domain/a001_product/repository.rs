use chrono::Utc;
use contracts::domain::a001_product::{Product, ProductId, ProductStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_product")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Product {
    type Error = anyhow::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| anyhow::anyhow!("Invalid product id '{}': {}", m.id, e))?;

        Ok(Product {
            id: ProductId(uuid),
            name: m.name,
            description: m.description,
            category: m.category,
            price: m.price,
            image_url: m.image_url,
            status: ProductStatus::from_str_or_pending(&m.status),
            created_at: m.created_at,
        })
    }
}

/// Строки с битым id пропускаются с ошибкой в логе
fn into_products(models: Vec<Model>) -> Vec<Product> {
    models
        .into_iter()
        .filter_map(|m| match Product::try_from(m) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::error!("Skipping corrupt a001_product row: {}", e);
                None
            }
        })
        .collect()
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Все товары, новые сверху
pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    let items = Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?;
    Ok(into_products(items))
}

/// Товары в указанном статусе, в порядке создания
pub async fn list_by_status(status: ProductStatus) -> anyhow::Result<Vec<Product>> {
    let items = Entity::find()
        .filter(Column::Status.eq(status.as_str()))
        .order_by_asc(Column::CreatedAt)
        .all(conn())
        .await?;
    Ok(into_products(items))
}

pub async fn insert(product: &Product) -> anyhow::Result<ProductId> {
    let active = ActiveModel {
        id: Set(product.id.to_string()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        category: Set(product.category.clone()),
        price: Set(product.price),
        image_url: Set(product.image_url.clone()),
        status: Set(product.status.as_str().to_string()),
        created_at: Set(product.created_at),
    };
    active.insert(conn()).await?;
    Ok(product.id)
}

/// Перевести товар из `from` в `to`. Возвращает false, если товар не найден
/// или уже не в статусе `from`.
pub async fn set_status(
    id: ProductId,
    from: ProductStatus,
    to: ProductStatus,
) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::Status.eq(from.as_str()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
