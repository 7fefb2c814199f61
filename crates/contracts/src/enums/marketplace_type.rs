use serde::{Deserialize, Serialize};

/// Маркетплейсы, в которые выгружается каталог
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketplaceType {
    #[serde(rename = "Mercado Livre")]
    MercadoLivre,
    #[serde(rename = "Shopee")]
    Shopee,
}

impl MarketplaceType {
    /// Получить код маркетплейса
    pub fn code(&self) -> &'static str {
        match self {
            MarketplaceType::MercadoLivre => "mp-ml",
            MarketplaceType::Shopee => "mp-shopee",
        }
    }

    /// Имя, под которым хранится настройка подключения и которое
    /// попадает в список `markets` результата выгрузки
    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceType::MercadoLivre => "Mercado Livre",
            MarketplaceType::Shopee => "Shopee",
        }
    }

    /// Порядок выгрузки: сначала Mercado Livre, затем Shopee
    pub fn all() -> Vec<MarketplaceType> {
        vec![MarketplaceType::MercadoLivre, MarketplaceType::Shopee]
    }

    /// Поиск по отображаемому имени (точное совпадение)
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.display_name() == name)
    }
}

impl std::fmt::Display for MarketplaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
