use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub mercado_livre: MercadoLivreConfig,
    #[serde(default)]
    pub shopee: ShopeeConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "target/db/catalog.db".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    /// Таймаут одного внешнего вызова
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MercadoLivreConfig {
    pub api_base: String,
    pub site_id: String,
    pub default_category_id: String,
}

impl Default for MercadoLivreConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.mercadolibre.com".into(),
            site_id: "MLB".into(),
            default_category_id: "MLB1234".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShopeeConfig {
    pub api_base: String,
    pub partner_id: String,
    pub partner_key: String,
    pub placeholder_image_id: String,
    pub placeholder_shop_id: String,
    pub category_id: i64,
}

impl Default for ShopeeConfig {
    fn default() -> Self {
        Self {
            api_base: "https://partner.shopeemobile.com".into(),
            partner_id: String::new(),
            partner_key: String::new(),
            placeholder_image_id: "shopee_image_id_123".into(),
            placeholder_shop_id: "MOCK_SHOP_ID".into(),
            category_id: 100001,
        }
    }
}

/// Ключ подписи, если partner_key не задан. Годится только для демо.
pub const MOCK_PARTNER_KEY: &str = "MOCK_KEY";

impl ShopeeConfig {
    /// Секрет партнёра для подписи запросов
    pub fn effective_partner_key(&self) -> &str {
        if self.partner_key.is_empty() {
            MOCK_PARTNER_KEY
        } else {
            &self.partner_key
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    /// Прекращать выгрузку товара после первой ошибки маркетплейса
    pub stop_on_first_error: bool,
    /// Переводить товар в `exported`, даже если ни один маркетплейс не настроен
    pub advance_when_nothing_exported: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            stop_on_first_error: true,
            advance_when_nothing_exported: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
            api_key: String::new(),
            model: "gemini-3-flash-preview".into(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/catalog.db"

[server]
host = "0.0.0.0"
port = 3000

[http]
timeout_secs = 30

[mercado_livre]
api_base = "https://api.mercadolibre.com"
site_id = "MLB"
default_category_id = "MLB1234"

[shopee]
api_base = "https://partner.shopeemobile.com"
partner_id = ""
partner_key = ""
placeholder_image_id = "shopee_image_id_123"
placeholder_shop_id = "MOCK_SHOP_ID"
category_id = 100001

[export]
stop_on_first_error = true
advance_when_nothing_exported = true

[ai]
api_base = "https://generativelanguage.googleapis.com/v1beta/openai"
api_key = ""
model = "gemini-3-flash-preview"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Secrets from the environment (SHOPEE_PARTNER_ID, SHOPEE_PARTNER_KEY,
/// GEMINI_API_KEY) override the file. This is the only place the
/// environment is read.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_config()?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    if config.shopee.partner_key.is_empty() {
        tracing::warn!(
            "Shopee partner_key is not set, requests will be signed with a mock key"
        );
    }

    Ok(config)
}

fn load_file_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("SHOPEE_PARTNER_ID").filter(|v| !v.is_empty()) {
        config.shopee.partner_id = v;
    }
    if let Some(v) = lookup("SHOPEE_PARTNER_KEY").filter(|v| !v.is_empty()) {
        config.shopee.partner_key = v;
    }
    if let Some(v) = lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
        config.ai.api_key = v;
    }
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/catalog.db");
        assert_eq!(config.mercado_livre.default_category_id, "MLB1234");
        assert_eq!(config.shopee.category_id, 100001);
        assert!(config.export.stop_on_first_error);
        assert!(config.export.advance_when_nothing_exported);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[export]
stop_on_first_error = false
"#,
        )
        .unwrap();
        assert!(!config.export.stop_on_first_error);
        assert!(config.export.advance_when_nothing_exported);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_secrets() {
        let mut config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        apply_env_overrides(&mut config, |key| match key {
            "SHOPEE_PARTNER_ID" => Some("1001".into()),
            "SHOPEE_PARTNER_KEY" => Some("secret".into()),
            _ => None,
        });
        assert_eq!(config.shopee.partner_id, "1001");
        assert_eq!(config.shopee.effective_partner_key(), "secret");
        assert!(config.ai.api_key.is_empty());
    }

    #[test]
    fn test_missing_partner_key_falls_back_to_mock() {
        let config = ShopeeConfig::default();
        assert_eq!(config.effective_partner_key(), MOCK_PARTNER_KEY);
    }
}
