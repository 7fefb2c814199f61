pub mod signature;

pub use signature::ShopeeSigner;

use super::{
    preview, provider_message, MarketplaceCredentials, MarketplaceError, MarketplaceExporter,
    MarketplaceProduct, ProviderResponse, Resolution,
};
use crate::shared::config::ShopeeConfig;
use async_trait::async_trait;
use contracts::enums::MarketplaceType;
use serde::{Deserialize, Serialize};

pub const ADD_ITEM_PATH: &str = "/api/v2/product/add_item";
pub const UPLOAD_IMAGE_PATH: &str = "/api/v2/media_space/upload_image";

const GENERIC_ERROR: &str = "Failed to export to Shopee";

/// HTTP-клиент для работы с Shopee Open Platform v2
pub struct ShopeeClient {
    client: reqwest::Client,
    api_base: String,
    signer: ShopeeSigner,
    placeholder_image_id: String,
    placeholder_shop_id: String,
    category_id: i64,
}

impl ShopeeClient {
    pub fn new(client: reqwest::Client, config: &ShopeeConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            signer: ShopeeSigner::new(
                config.partner_id.clone(),
                config.effective_partner_key().to_string(),
            ),
            placeholder_image_id: config.placeholder_image_id.clone(),
            placeholder_shop_id: config.placeholder_shop_id.clone(),
            category_id: config.category_id,
        }
    }

    /// Подписанные query-параметры: partner_id, timestamp, access_token, shop_id, sign
    fn signed_query(
        &self,
        path: &str,
        access_token: &str,
        shop_id: &str,
    ) -> Vec<(&'static str, String)> {
        let timestamp = chrono::Utc::now().timestamp();
        let sign = self.signer.sign(path, timestamp, access_token, shop_id);
        vec![
            ("partner_id", self.signer.partner_id().to_string()),
            ("timestamp", timestamp.to_string()),
            ("access_token", access_token.to_string()),
            ("shop_id", shop_id.to_string()),
            ("sign", sign),
        ]
    }

    fn fallback_image(&self) -> Resolution<String> {
        Resolution::Fallback(self.placeholder_image_id.clone())
    }

    /// Загрузить изображение в media space. При любой ошибке используется
    /// placeholder image id.
    pub async fn upload_image(
        &self,
        image_url: &str,
        access_token: &str,
        shop_id: &str,
    ) -> Resolution<String> {
        if image_url.is_empty() {
            return self.fallback_image();
        }

        let bytes = match self.fetch_image(image_url).await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Image upload failed, using fallback ID: {}", e);
                return self.fallback_image();
            }
        };

        tracing::info!("Uploading image to Shopee media space ({} bytes)", bytes.len());
        let part = reqwest::multipart::Part::bytes(bytes).file_name("image.jpg");
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = match self
            .client
            .post(format!("{}{}", self.api_base, UPLOAD_IMAGE_PATH))
            .query(&self.signed_query(UPLOAD_IMAGE_PATH, access_token, shop_id))
            .multipart(form)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!(
                    "Image upload failed (HTTP {}), using fallback ID",
                    r.status().as_u16()
                );
                return self.fallback_image();
            }
            Err(e) => {
                tracing::warn!("Image upload failed, using fallback ID: {}", e);
                return self.fallback_image();
            }
        };

        match response.json::<UploadImageResponse>().await {
            Ok(body) => match body.image_id() {
                Some(id) => Resolution::Resolved(id),
                None => {
                    tracing::warn!(
                        "Image upload returned no image_id (error: {:?}), using fallback ID",
                        body.error
                    );
                    self.fallback_image()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse image upload response: {}", e);
                self.fallback_image()
            }
        }
    }

    async fn fetch_image(&self, image_url: &str) -> anyhow::Result<Vec<u8>> {
        let response = self.client.get(image_url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Собрать тело POST /product/add_item
    pub fn build_item(
        &self,
        product: &MarketplaceProduct,
        image_id: String,
    ) -> ShopeeAddItemRequest {
        ShopeeAddItemRequest {
            original_price: product.price,
            description: product.description.clone(),
            item_name: product.name.clone(),
            normal_stock: 1,
            category_id: self.category_id,
            brand: ShopeeBrand { brand_id: 0 },
            image: ShopeeImage {
                image_id_list: vec![image_id],
            },
        }
    }

    /// Выгрузить товар: загрузка изображения, затем подписанный add_item
    pub async fn export_product(
        &self,
        product: &MarketplaceProduct,
        credentials: &MarketplaceCredentials,
    ) -> Result<ProviderResponse, MarketplaceError> {
        let access_token = credentials.access_token.as_str();
        if access_token.is_empty() {
            return Err(MarketplaceError::Auth("Shopee access token not found".into()));
        }

        let shop_id = match credentials.shop_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                tracing::warn!("Shopee shop_id is not configured, using placeholder");
                self.placeholder_shop_id.clone()
            }
        };

        let image_id = self
            .upload_image(&product.image_url, access_token, &shop_id)
            .await
            .into_value();
        let item = self.build_item(product, image_id);

        let url = format!("{}{}", self.api_base, ADD_ITEM_PATH);
        tracing::debug!("POST {} (shop_id: {}, access_token: ****)", url, shop_id);

        let response = self
            .client
            .post(&url)
            .query(&self.signed_query(ADD_ITEM_PATH, access_token, &shop_id))
            .json(&item)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Shopee Export Error: {}", e);
                MarketplaceError::Provider(GENERIC_ERROR.into())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Shopee Export Error: failed to read body: {}", e);
            MarketplaceError::Provider(GENERIC_ERROR.into())
        })?;

        if !status.is_success() {
            tracing::error!(
                "Shopee Export Error: HTTP {}: {}",
                status.as_u16(),
                preview(&body)
            );
            return Err(MarketplaceError::Provider(
                provider_message(&body).unwrap_or_else(|| GENERIC_ERROR.into()),
            ));
        }

        let value = serde_json::from_str::<ProviderResponse>(&body).map_err(|e| {
            tracing::error!("Failed to parse Shopee response: {}. Body: {}", e, preview(&body));
            MarketplaceError::Provider(GENERIC_ERROR.into())
        })?;

        // Shopee может ответить 200 с непустым полем `error`
        let api_error = value
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty());
        if let Some(code) = api_error {
            tracing::error!("Shopee Export Error: {}: {}", code, preview(&body));
            return Err(MarketplaceError::Provider(
                provider_message(&body).unwrap_or_else(|| GENERIC_ERROR.into()),
            ));
        }

        Ok(value)
    }
}

#[async_trait]
impl MarketplaceExporter for ShopeeClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::Shopee
    }

    async fn export(
        &self,
        product: &MarketplaceProduct,
        credentials: &MarketplaceCredentials,
    ) -> Result<ProviderResponse, MarketplaceError> {
        self.export_product(product, credentials).await
    }
}

// ============================================================================
// Request/Response structures
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShopeeAddItemRequest {
    pub original_price: f64,
    pub description: String,
    pub item_name: String,
    pub normal_stock: i32,
    pub category_id: i64,
    pub brand: ShopeeBrand,
    pub image: ShopeeImage,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShopeeBrand {
    pub brand_id: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShopeeImage {
    pub image_id_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UploadImageResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    response: Option<UploadImagePayload>,
}

#[derive(Debug, Deserialize)]
struct UploadImagePayload {
    #[serde(default)]
    image_info: Option<UploadImageInfo>,
}

#[derive(Debug, Deserialize)]
struct UploadImageInfo {
    #[serde(default)]
    image_id: Option<String>,
}

impl UploadImageResponse {
    fn image_id(&self) -> Option<String> {
        self.response
            .as_ref()?
            .image_info
            .as_ref()?
            .image_id
            .clone()
            .filter(|id| !id.is_empty())
    }
}
