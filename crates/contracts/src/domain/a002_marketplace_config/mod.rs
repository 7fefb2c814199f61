pub mod aggregate;

pub use aggregate::{MarketplaceConfig, MarketplaceConfigDto, MarketplaceConfigId};
