use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::MarketplaceType;

/// Уникальный идентификатор настройки подключения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketplaceConfigId(pub Uuid);

impl MarketplaceConfigId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

/// Учётные данные подключения к маркетплейсу.
///
/// Имя уникально: на каждый маркетплейс хранится не больше одной записи.
/// `shop_id` хранится отдельным полем, `refresh_token` используется только
/// по прямому назначению.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceConfig {
    pub id: MarketplaceConfigId,
    pub name: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub shop_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl MarketplaceConfig {
    pub fn new(name: String, access_token: String) -> Self {
        Self {
            id: MarketplaceConfigId::new_v4(),
            name,
            access_token,
            refresh_token: None,
            shop_id: None,
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Маркетплейс, к которому относится настройка (если имя известно)
    pub fn marketplace(&self) -> Option<MarketplaceType> {
        MarketplaceType::from_display_name(&self.name)
    }

    /// Настроен ли маркетплейс: есть непустой access token
    pub fn is_configured(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Применить данные из формы настроек.
    ///
    /// Поля, которых нет в запросе, не меняются. Пустая строка очищает поле.
    pub fn apply(&mut self, dto: &MarketplaceConfigDto) -> Result<(), String> {
        let expires_at = dto.parsed_expires_at()?;

        if let Some(token) = &dto.access_token {
            self.access_token = token.clone();
        }
        if let Some(refresh) = &dto.refresh_token {
            self.refresh_token = Some(refresh.clone()).filter(|s| !s.is_empty());
        }
        if let Some(shop_id) = &dto.shop_id {
            self.shop_id = Some(shop_id.clone()).filter(|s| !s.is_empty());
        }
        if dto.expires_at.is_some() {
            self.expires_at = expires_at;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Тело запроса upsert из страницы настроек
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceConfigDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub shop_id: Option<String>,
    /// RFC 3339
    #[serde(default)]
    pub expires_at: Option<String>,
}

impl MarketplaceConfigDto {
    pub fn validated_name(&self) -> Result<String, String> {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err("Не указано имя маркетплейса".into()),
        }
    }

    pub fn parsed_expires_at(&self) -> Result<Option<DateTime<Utc>>, String> {
        match self.expires_at.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|e| format!("Invalid expiresAt '{}': {}", raw, e)),
        }
    }
}
