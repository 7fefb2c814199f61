use super::{
    preview, provider_message, MarketplaceCredentials, MarketplaceError, MarketplaceExporter,
    MarketplaceProduct, ProviderResponse, Resolution,
};
use crate::shared::config::MercadoLivreConfig;
use async_trait::async_trait;
use contracts::enums::MarketplaceType;
use serde::{Deserialize, Serialize};

const GENERIC_ERROR: &str = "Failed to export to Mercado Livre";

/// HTTP-клиент для работы с API Mercado Livre
pub struct MercadoLivreClient {
    client: reqwest::Client,
    api_base: String,
    site_id: String,
    default_category_id: String,
}

impl MercadoLivreClient {
    pub fn new(client: reqwest::Client, config: &MercadoLivreConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            site_id: config.site_id.clone(),
            default_category_id: config.default_category_id.clone(),
        }
    }

    /// Подобрать категорию через GET /sites/{site}/category_predictor/predict.
    /// Любая ошибка даёт категорию по умолчанию.
    pub async fn resolve_category(&self, title: &str, access_token: &str) -> Resolution<String> {
        let url = format!(
            "{}/sites/{}/category_predictor/predict?title={}",
            self.api_base,
            self.site_id,
            urlencoding::encode(title)
        );

        let response = match self.client.get(&url).bearer_auth(access_token).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Mercado Livre category predictor unavailable: {}", e);
                return self.fallback_category();
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Mercado Livre category predictor returned HTTP {}",
                response.status().as_u16()
            );
            return self.fallback_category();
        }

        match response.json::<CategoryPrediction>().await {
            Ok(CategoryPrediction { id: Some(id) }) if !id.is_empty() => Resolution::Resolved(id),
            Ok(_) => {
                tracing::warn!("Mercado Livre category predictor returned no id for '{}'", title);
                self.fallback_category()
            }
            Err(e) => {
                tracing::warn!("Failed to parse category prediction: {}", e);
                self.fallback_category()
            }
        }
    }

    fn fallback_category(&self) -> Resolution<String> {
        Resolution::Fallback(self.default_category_id.clone())
    }

    /// Собрать объявление для POST /items
    pub fn build_listing(product: &MarketplaceProduct, category_id: String) -> MlItemRequest {
        MlItemRequest {
            title: product.name.clone(),
            category_id,
            price: product.price,
            currency_id: "BRL".into(),
            available_quantity: 1,
            condition: "new".into(),
            listing_type_id: "gold_pro".into(),
            description: MlDescription {
                plain_text: product.description.clone(),
            },
            pictures: vec![MlPicture {
                source: product.image_url.clone(),
            }],
        }
    }

    /// Выгрузить товар: подбор категории, затем создание объявления
    pub async fn export_product(
        &self,
        product: &MarketplaceProduct,
        access_token: &str,
    ) -> Result<ProviderResponse, MarketplaceError> {
        if access_token.is_empty() {
            return Err(MarketplaceError::Auth(
                "Mercado Livre access token not found".into(),
            ));
        }

        let query = if product.category.is_empty() {
            &product.name
        } else {
            &product.category
        };
        let category = self.resolve_category(query, access_token).await;
        if category.is_fallback() {
            tracing::info!(
                "Using default Mercado Livre category {} for '{}'",
                category.value(),
                product.name
            );
        }

        let listing = Self::build_listing(product, category.into_value());
        let url = format!("{}/items", self.api_base);
        tracing::debug!("POST {} (Authorization: Bearer ****)", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&listing)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Mercado Livre Export Error: {}", e);
                MarketplaceError::Provider(GENERIC_ERROR.into())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Mercado Livre Export Error: failed to read body: {}", e);
            MarketplaceError::Provider(GENERIC_ERROR.into())
        })?;

        if !status.is_success() {
            tracing::error!(
                "Mercado Livre Export Error: HTTP {}: {}",
                status.as_u16(),
                preview(&body)
            );
            return Err(MarketplaceError::Provider(
                provider_message(&body).unwrap_or_else(|| GENERIC_ERROR.into()),
            ));
        }

        serde_json::from_str::<ProviderResponse>(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse Mercado Livre response: {}. Body: {}",
                e,
                preview(&body)
            );
            MarketplaceError::Provider(GENERIC_ERROR.into())
        })
    }
}

#[async_trait]
impl MarketplaceExporter for MercadoLivreClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::MercadoLivre
    }

    async fn export(
        &self,
        product: &MarketplaceProduct,
        credentials: &MarketplaceCredentials,
    ) -> Result<ProviderResponse, MarketplaceError> {
        self.export_product(product, &credentials.access_token).await
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct CategoryPrediction {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlItemRequest {
    pub title: String,
    pub category_id: String,
    pub price: f64,
    pub currency_id: String,
    pub available_quantity: i32,
    pub condition: String,
    pub listing_type_id: String,
    pub description: MlDescription,
    pub pictures: Vec<MlPicture>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlDescription {
    pub plain_text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlPicture {
    pub source: String,
}
