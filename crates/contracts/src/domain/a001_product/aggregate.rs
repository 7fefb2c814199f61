use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор товара каталога
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Статус выгрузки товара.
///
/// Допустим только переход `Pending -> Exported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Pending,
    Exported,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Exported => "exported",
        }
    }

    pub fn from_str_or_pending(s: &str) -> Self {
        match s {
            "exported" => Self::Exported,
            _ => Self::Pending,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Товар каталога
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Цена без привязки к валюте
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Создать новый товар в статусе `pending`
    pub fn new_pending(
        name: String,
        description: Option<String>,
        category: Option<String>,
        price: Option<f64>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: ProductId::new_v4(),
            name,
            description,
            category,
            price,
            image_url,
            status: ProductStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Наименование товара не может быть пустым".into());
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(format!("Некорректная цена: {}", price));
            }
        }
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == ProductStatus::Pending
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Тело запроса на создание товара (форма добавления).
///
/// Цена приходит либо числом, либо строкой с `,` или `.` в качестве
/// десятичного разделителя.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewProductDto {
    /// Разобрать цену; нечисловые и бесконечные значения дают `None`
    pub fn parsed_price(&self) -> Option<f64> {
        let value = match self.price.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Построить агрегат: имя обрезается, пустые необязательные поля становятся `None`
    pub fn into_product(self) -> Product {
        let price = self.parsed_price();
        Product::new_pending(
            self.name.unwrap_or_default().trim().to_string(),
            non_empty(self.description),
            non_empty(self.category),
            price,
            non_empty(self.image_url),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(price: serde_json::Value) -> NewProductDto {
        NewProductDto {
            name: Some("  Mouse  ".into()),
            price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn test_price_accepts_comma_decimal_separator() {
        assert_eq!(dto(json!("49,90")).parsed_price(), Some(49.9));
        assert_eq!(dto(json!(12.5)).parsed_price(), Some(12.5));
        assert_eq!(dto(json!("abc")).parsed_price(), None);
        assert_eq!(dto(json!(null)).parsed_price(), None);
    }

    #[test]
    fn test_into_product_normalizes_fields() {
        let mut d = dto(json!("10"));
        d.description = Some(String::new());
        d.image_url = Some("https://img/1.jpg".into());
        let product = d.into_product();

        assert_eq!(product.name, "Mouse");
        assert_eq!(product.description, None);
        assert_eq!(product.image_url.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(product.status, ProductStatus::Pending);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_name_and_negative_price() {
        let empty = NewProductDto::default().into_product();
        assert!(empty.validate().is_err());

        let negative = dto(json!(-1)).into_product();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let product = Product::new_pending("Mouse".into(), None, None, Some(49.9), None);
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
