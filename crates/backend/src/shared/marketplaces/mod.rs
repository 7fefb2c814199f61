pub mod mercado_livre;
pub mod shopee;

use async_trait::async_trait;
use contracts::domain::a001_product::Product;
use contracts::domain::a002_marketplace_config::MarketplaceConfig;
use contracts::enums::MarketplaceType;
use std::time::Duration;

/// Ответ маркетплейса как есть (JSON тела ответа)
pub type ProviderResponse = serde_json::Value;

/// Ошибки выгрузки в маркетплейс
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketplaceError {
    /// Нет учётных данных для маркетплейса
    #[error("{0}")]
    Auth(String),

    /// Маркетплейс ответил ошибкой, некорректным телом или не ответил вовсе
    #[error("{0}")]
    Provider(String),
}

/// Результат шага, который выполняется "по возможности".
///
/// `Fallback` несёт значение по умолчанию, подставленное вместо
/// неудавшегося вызова.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Resolved(T),
    Fallback(T),
}

impl<T> Resolution<T> {
    pub fn value(&self) -> &T {
        match self {
            Resolution::Resolved(v) | Resolution::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Resolution::Resolved(v) | Resolution::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

/// Нормализованная проекция товара для адаптеров маркетплейсов.
/// Отсутствующие поля заменяются пустой строкой или нулём.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceProduct {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub image_url: String,
}

impl From<&Product> for MarketplaceProduct {
    fn from(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone().unwrap_or_default(),
            category: p.category.clone().unwrap_or_default(),
            price: p.price.unwrap_or(0.0),
            image_url: p.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Учётные данные, передаваемые адаптеру
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketplaceCredentials {
    pub access_token: String,
    pub shop_id: Option<String>,
}

impl From<&MarketplaceConfig> for MarketplaceCredentials {
    fn from(c: &MarketplaceConfig) -> Self {
        Self {
            access_token: c.access_token.clone(),
            shop_id: c.shop_id.clone(),
        }
    }
}

/// Трейт адаптера маркетплейса
#[async_trait]
pub trait MarketplaceExporter: Send + Sync {
    fn marketplace(&self) -> MarketplaceType;

    /// Выгрузить один товар
    async fn export(
        &self,
        product: &MarketplaceProduct,
        credentials: &MarketplaceCredentials,
    ) -> Result<ProviderResponse, MarketplaceError>;
}

/// HTTP-клиент с ограничением времени на каждый вызов
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))
}

/// Сообщение об ошибке из JSON-тела ответа (поле `message`)
pub(crate) fn provider_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Начало тела ответа для логов
pub(crate) fn preview(body: &str) -> String {
    let preview: String = body.chars().take(500).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}
