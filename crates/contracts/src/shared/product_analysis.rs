use serde::{Deserialize, Serialize};

/// Запрос на автозаполнение карточки товара по имени и фото
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AnalyzeProductRequest {
    /// Имя и URL изображения, если оба непустые
    pub fn required_fields(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|s| !s.is_empty())?;
        let image_url = self.image_url.as_deref().filter(|s| !s.is_empty())?;
        Some((name, image_url))
    }
}

/// Предложение модели для карточки товара
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub description: String,
    pub category: String,
    /// Рекомендуемая цена в BRL
    pub suggested_price: f64,
}
