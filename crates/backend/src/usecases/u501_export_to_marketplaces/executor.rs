use super::store::{DbExportStore, ExportStore};
use crate::shared::config::{Config, ExportConfig};
use crate::shared::marketplaces::{
    build_http_client, mercado_livre::MercadoLivreClient, shopee::ShopeeClient,
    MarketplaceCredentials, MarketplaceExporter, MarketplaceProduct,
};
use anyhow::Result;
use contracts::domain::a001_product::Product;
use contracts::domain::a002_marketplace_config::MarketplaceConfig;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_export_to_marketplaces::{
    ExportResponse, ExportResult, ExportToMarketplaces,
};
use std::sync::Arc;

/// Политика выгрузки товара
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPolicy {
    /// После первой ошибки маркетплейса остальные для этого товара не вызываются
    pub stop_on_first_error: bool,
    /// Переводить товар в `exported`, даже если ни в один маркетплейс он не ушёл
    pub advance_when_nothing_exported: bool,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self {
            stop_on_first_error: true,
            advance_when_nothing_exported: true,
        }
    }
}

impl From<&ExportConfig> for ExportPolicy {
    fn from(c: &ExportConfig) -> Self {
        Self {
            stop_on_first_error: c.stop_on_first_error,
            advance_when_nothing_exported: c.advance_when_nothing_exported,
        }
    }
}

/// Executor для UseCase выгрузки в маркетплейсы.
///
/// Товары обрабатываются последовательно, маркетплейсы для каждого товара
/// вызываются в порядке `exporters`.
pub struct ExportExecutor {
    store: Arc<dyn ExportStore>,
    exporters: Vec<Arc<dyn MarketplaceExporter>>,
    policy: ExportPolicy,
}

impl ExportExecutor {
    pub fn new(
        store: Arc<dyn ExportStore>,
        exporters: Vec<Arc<dyn MarketplaceExporter>>,
        policy: ExportPolicy,
    ) -> Self {
        Self {
            store,
            exporters,
            policy,
        }
    }

    /// Рабочая сборка: SQLite, Mercado Livre, затем Shopee
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(config.http.timeout())?;
        let exporters: Vec<Arc<dyn MarketplaceExporter>> = vec![
            Arc::new(MercadoLivreClient::new(client.clone(), &config.mercado_livre)),
            Arc::new(ShopeeClient::new(client, &config.shopee)),
        ];
        Ok(Self::new(
            Arc::new(DbExportStore),
            exporters,
            ExportPolicy::from(&config.export),
        ))
    }

    /// Выгрузить все товары в статусе `pending`.
    ///
    /// `Err` только если хранилище недоступно до начала обработки товаров;
    /// ошибки отдельных товаров попадают в их `ExportResult`.
    pub async fn run_export(&self) -> Result<ExportResponse> {
        let products = self.store.pending_products().await?;
        if products.is_empty() {
            tracing::info!("No pending products to export");
            return Ok(ExportResponse::nothing_to_export());
        }

        let configs = self.store.marketplace_configs().await?;
        tracing::info!(
            "{}: starting export of {} pending products ({:?})",
            ExportToMarketplaces::full_name(),
            products.len(),
            self.policy
        );

        let mut results = Vec::with_capacity(products.len());
        for product in &products {
            let result = self.export_product(product, &configs).await;
            if result.is_success() {
                tracing::info!("Product {} exported to {:?}", product.id, result.markets);
            } else {
                tracing::warn!(
                    "Product {} export failed: {}",
                    product.id,
                    result.error.as_deref().unwrap_or_default()
                );
            }
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            "Export completed: {} products, {} with errors",
            results.len(),
            failed
        );

        Ok(ExportResponse::Completed { results })
    }

    async fn export_product(
        &self,
        product: &Product,
        configs: &[MarketplaceConfig],
    ) -> ExportResult {
        let mut result = ExportResult::new(product.id);
        let data = MarketplaceProduct::from(product);

        for exporter in &self.exporters {
            let marketplace = exporter.marketplace();
            let config = configs
                .iter()
                .find(|c| c.name == marketplace.display_name())
                .filter(|c| c.is_configured());
            let Some(config) = config else {
                tracing::debug!("{} is not configured, skipping", marketplace);
                continue;
            };

            match exporter
                .export(&data, &MarketplaceCredentials::from(config))
                .await
            {
                Ok(_) => result.markets.push(marketplace.display_name().to_string()),
                Err(e) => {
                    tracing::error!(
                        "{} export of product {} failed: {}",
                        marketplace,
                        product.id,
                        e
                    );
                    result.record_error(e.to_string());
                    if self.policy.stop_on_first_error {
                        break;
                    }
                }
            }
        }

        if !result.is_success() {
            return result;
        }

        if result.markets.is_empty() && !self.policy.advance_when_nothing_exported {
            tracing::warn!(
                "Product {} was not exported to any marketplace, keeping it pending",
                product.id
            );
            return result;
        }

        if let Err(e) = self.store.mark_exported(product.id).await {
            tracing::error!("Failed to mark product {} as exported: {}", product.id, e);
            result.record_error(e.to_string());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::MercadoLivreConfig;
    use crate::shared::marketplaces::{MarketplaceError, ProviderResponse};
    use async_trait::async_trait;
    use contracts::domain::a001_product::{ProductId, ProductStatus};
    use contracts::enums::MarketplaceType;
    use contracts::usecases::u501_export_to_marketplaces::ExportResultStatus;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ------------------------------------------------------------------
    // In-memory store
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct MemoryStore {
        products: Mutex<Vec<Product>>,
        configs: Vec<MarketplaceConfig>,
        unreachable: bool,
        fail_mark: bool,
    }

    impl MemoryStore {
        fn with(products: Vec<Product>, configs: Vec<MarketplaceConfig>) -> Self {
            Self {
                products: Mutex::new(products),
                configs,
                ..Default::default()
            }
        }

        fn status_of(&self, id: ProductId) -> ProductStatus {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.status)
                .unwrap()
        }
    }

    #[async_trait]
    impl ExportStore for MemoryStore {
        async fn pending_products(&self) -> anyhow::Result<Vec<Product>> {
            if self.unreachable {
                anyhow::bail!("database is locked");
            }
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.is_pending())
                .cloned()
                .collect())
        }

        async fn marketplace_configs(&self) -> anyhow::Result<Vec<MarketplaceConfig>> {
            Ok(self.configs.clone())
        }

        async fn mark_exported(&self, id: ProductId) -> anyhow::Result<()> {
            if self.fail_mark {
                anyhow::bail!("disk I/O error");
            }
            let mut products = self.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == id && p.is_pending())
                .ok_or_else(|| anyhow::anyhow!("Product {} is not pending", id))?;
            product.status = ProductStatus::Exported;
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Scripted exporter
    // ------------------------------------------------------------------

    struct FakeExporter {
        marketplace: MarketplaceType,
        failure: Option<String>,
        calls: AtomicUsize,
        seen_shop_ids: Mutex<Vec<Option<String>>>,
    }

    impl FakeExporter {
        fn ok(marketplace: MarketplaceType) -> Arc<Self> {
            Arc::new(Self {
                marketplace,
                failure: None,
                calls: AtomicUsize::new(0),
                seen_shop_ids: Mutex::new(Vec::new()),
            })
        }

        fn failing(marketplace: MarketplaceType, message: &str) -> Arc<Self> {
            Arc::new(Self {
                marketplace,
                failure: Some(message.to_string()),
                calls: AtomicUsize::new(0),
                seen_shop_ids: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketplaceExporter for FakeExporter {
        fn marketplace(&self) -> MarketplaceType {
            self.marketplace
        }

        async fn export(
            &self,
            _product: &MarketplaceProduct,
            credentials: &MarketplaceCredentials,
        ) -> Result<ProviderResponse, MarketplaceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_shop_ids
                .lock()
                .unwrap()
                .push(credentials.shop_id.clone());
            match &self.failure {
                Some(message) => Err(MarketplaceError::Provider(message.clone())),
                None => Ok(json!({ "id": "remote-1" })),
            }
        }
    }

    fn product(name: &str, price: Option<f64>) -> Product {
        Product::new_pending(name.into(), None, None, price, None)
    }

    fn config(marketplace: MarketplaceType, token: &str) -> MarketplaceConfig {
        MarketplaceConfig::new(marketplace.display_name().into(), token.into())
    }

    fn executor(
        store: Arc<MemoryStore>,
        exporters: Vec<Arc<dyn MarketplaceExporter>>,
        policy: ExportPolicy,
    ) -> ExportExecutor {
        ExportExecutor::new(store, exporters, policy)
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_nothing_configured_still_marks_products_exported() {
        let products = vec![product("Mouse", Some(49.9)), product("Teclado", None)];
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        let store = Arc::new(MemoryStore::with(products, vec![]));
        let ml = FakeExporter::ok(MarketplaceType::MercadoLivre);
        let shopee = FakeExporter::ok(MarketplaceType::Shopee);

        let response = executor(
            store.clone(),
            vec![ml.clone(), shopee.clone()],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        for (result, id) in response.results().iter().zip(&ids) {
            assert_eq!(result.product_id, *id);
            assert_eq!(result.status, ExportResultStatus::Success);
            assert!(result.markets.is_empty());
            assert_eq!(store.status_of(*id), ProductStatus::Exported);
        }
        assert_eq!(ml.calls() + shopee.calls(), 0);
    }

    #[tokio::test]
    async fn test_corrected_policy_keeps_unexported_products_pending() {
        let p = product("Mouse", None);
        let id = p.id;
        let store = Arc::new(MemoryStore::with(vec![p], vec![]));
        let policy = ExportPolicy {
            advance_when_nothing_exported: false,
            ..Default::default()
        };

        let response = executor(store.clone(), vec![], policy)
            .run_export()
            .await
            .unwrap();

        assert_eq!(response.results()[0].status, ExportResultStatus::Success);
        assert_eq!(store.status_of(id), ProductStatus::Pending);
    }

    #[tokio::test]
    async fn test_mercado_livre_failure_skips_shopee_and_keeps_pending() {
        let p = product("Mouse", Some(49.9));
        let id = p.id;
        let store = Arc::new(MemoryStore::with(
            vec![p],
            vec![
                config(MarketplaceType::MercadoLivre, "ml-token"),
                config(MarketplaceType::Shopee, "shopee-token"),
            ],
        ));
        let ml = FakeExporter::failing(MarketplaceType::MercadoLivre, "invalid title");
        let shopee = FakeExporter::ok(MarketplaceType::Shopee);

        let response = executor(
            store.clone(),
            vec![ml.clone(), shopee.clone()],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        let result = &response.results()[0];
        assert_eq!(result.status, ExportResultStatus::PartialError);
        assert_eq!(result.error.as_deref(), Some("invalid title"));
        assert!(result.markets.is_empty());
        assert_eq!(ml.calls(), 1);
        assert_eq!(shopee.calls(), 0);
        assert_eq!(store.status_of(id), ProductStatus::Pending);
    }

    #[tokio::test]
    async fn test_attempt_all_policy_still_tries_shopee() {
        let p = product("Mouse", Some(49.9));
        let id = p.id;
        let store = Arc::new(MemoryStore::with(
            vec![p],
            vec![
                config(MarketplaceType::MercadoLivre, "ml-token"),
                config(MarketplaceType::Shopee, "shopee-token"),
            ],
        ));
        let ml = FakeExporter::failing(MarketplaceType::MercadoLivre, "invalid title");
        let shopee = FakeExporter::ok(MarketplaceType::Shopee);
        let policy = ExportPolicy {
            stop_on_first_error: false,
            ..Default::default()
        };

        let response = executor(store.clone(), vec![ml.clone(), shopee.clone()], policy)
            .run_export()
            .await
            .unwrap();

        let result = &response.results()[0];
        assert_eq!(result.status, ExportResultStatus::PartialError);
        assert_eq!(result.markets, vec!["Shopee".to_string()]);
        assert_eq!(shopee.calls(), 1);
        assert_eq!(store.status_of(id), ProductStatus::Pending);
    }

    #[tokio::test]
    async fn test_both_marketplaces_succeed_in_order() {
        let p = product("Mouse", Some(49.9));
        let mut shopee_config = config(MarketplaceType::Shopee, "shopee-token");
        shopee_config.shop_id = Some("12345".into());
        let store = Arc::new(MemoryStore::with(
            vec![p],
            vec![shopee_config, config(MarketplaceType::MercadoLivre, "ml-token")],
        ));
        let ml = FakeExporter::ok(MarketplaceType::MercadoLivre);
        let shopee = FakeExporter::ok(MarketplaceType::Shopee);

        let response = executor(
            store.clone(),
            vec![ml.clone(), shopee.clone()],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        assert_eq!(
            response.results()[0].markets,
            vec!["Mercado Livre".to_string(), "Shopee".to_string()]
        );
        assert_eq!(
            *shopee.seen_shop_ids.lock().unwrap(),
            vec![Some("12345".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_access_token_means_not_configured() {
        let store = Arc::new(MemoryStore::with(
            vec![product("Mouse", None)],
            vec![config(MarketplaceType::MercadoLivre, "")],
        ));
        let ml = FakeExporter::ok(MarketplaceType::MercadoLivre);

        let response = executor(store, vec![ml.clone()], ExportPolicy::default())
            .run_export()
            .await
            .unwrap();

        assert_eq!(ml.calls(), 0);
        assert!(response.results()[0].markets.is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_product_does_not_block_the_next() {
        let first = product("Mouse", None);
        let second = product("Teclado", None);
        let second_id = second.id;
        let store = Arc::new(MemoryStore::with(
            vec![first, second],
            vec![config(MarketplaceType::MercadoLivre, "ml-token")],
        ));

        struct FailFirst(AtomicUsize);

        #[async_trait]
        impl MarketplaceExporter for FailFirst {
            fn marketplace(&self) -> MarketplaceType {
                MarketplaceType::MercadoLivre
            }

            async fn export(
                &self,
                _product: &MarketplaceProduct,
                _credentials: &MarketplaceCredentials,
            ) -> Result<ProviderResponse, MarketplaceError> {
                if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(MarketplaceError::Provider("timeout".into()))
                } else {
                    Ok(json!({}))
                }
            }
        }

        let response = executor(
            store.clone(),
            vec![Arc::new(FailFirst(AtomicUsize::new(0)))],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        let results = response.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, ExportResultStatus::PartialError);
        assert_eq!(results[1].status, ExportResultStatus::Success);
        assert_eq!(store.status_of(second_id), ProductStatus::Exported);
    }

    #[tokio::test]
    async fn test_second_run_has_nothing_to_export() {
        let store = Arc::new(MemoryStore::with(vec![product("Mouse", None)], vec![]));
        let exec = executor(store, vec![], ExportPolicy::default());

        let first = exec.run_export().await.unwrap();
        assert_eq!(first.results().len(), 1);

        let second = exec.run_export().await.unwrap();
        assert_eq!(second, ExportResponse::nothing_to_export());
    }

    #[tokio::test]
    async fn test_unreachable_store_aborts_the_run() {
        let store = Arc::new(MemoryStore {
            unreachable: true,
            ..Default::default()
        });
        let result = executor(store, vec![], ExportPolicy::default())
            .run_export()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_status_update_failure_is_recorded_as_partial_error() {
        let store = Arc::new(MemoryStore {
            products: Mutex::new(vec![product("Mouse", None)]),
            configs: vec![config(MarketplaceType::MercadoLivre, "ml-token")],
            fail_mark: true,
            ..Default::default()
        });
        let ml = FakeExporter::ok(MarketplaceType::MercadoLivre);

        let response = executor(store, vec![ml], ExportPolicy::default())
            .run_export()
            .await
            .unwrap();

        let result = &response.results()[0];
        assert_eq!(result.status, ExportResultStatus::PartialError);
        assert_eq!(result.markets, vec!["Mercado Livre".to_string()]);
        assert_eq!(result.error.as_deref(), Some("disk I/O error"));
    }

    // ------------------------------------------------------------------
    // End-to-end with the real Mercado Livre adapter against a mock server
    // ------------------------------------------------------------------

    fn mercado_livre(server: &MockServer) -> Arc<dyn MarketplaceExporter> {
        let config = MercadoLivreConfig {
            api_base: server.uri(),
            ..Default::default()
        };
        Arc::new(MercadoLivreClient::new(reqwest::Client::new(), &config))
    }

    #[tokio::test]
    async fn test_mouse_exported_to_mercado_livre_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sites/MLB/category_predictor/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "MLB1648" })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "MLB999" })))
            .mount(&server)
            .await;

        let p = product("Mouse", Some(49.9));
        let id = p.id;
        let store = Arc::new(MemoryStore::with(
            vec![p],
            vec![config(MarketplaceType::MercadoLivre, "valid-token")],
        ));
        let shopee = FakeExporter::ok(MarketplaceType::Shopee);

        let response = executor(
            store.clone(),
            vec![mercado_livre(&server), shopee.clone()],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        let result = &response.results()[0];
        assert_eq!(result.status, ExportResultStatus::Success);
        assert_eq!(result.markets, vec!["Mercado Livre".to_string()]);
        assert_eq!(result.error, None);
        assert_eq!(shopee.calls(), 0);
        assert_eq!(store.status_of(id), ProductStatus::Exported);
    }

    #[tokio::test]
    async fn test_mercado_livre_rejection_keeps_product_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid title" })),
            )
            .mount(&server)
            .await;

        let p = product("Mouse", Some(49.9));
        let id = p.id;
        let store = Arc::new(MemoryStore::with(
            vec![p],
            vec![config(MarketplaceType::MercadoLivre, "valid-token")],
        ));

        let response = executor(
            store.clone(),
            vec![mercado_livre(&server)],
            ExportPolicy::default(),
        )
        .run_export()
        .await
        .unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "results": [{
                    "productId": id.to_string(),
                    "status": "partial_error",
                    "markets": [],
                    "error": "invalid title"
                }]
            })
        );
        assert_eq!(store.status_of(id), ProductStatus::Pending);
    }
}
