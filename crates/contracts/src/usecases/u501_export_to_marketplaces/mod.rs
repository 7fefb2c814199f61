pub mod response;

pub use response::{ExportResponse, ExportResult, ExportResultStatus, NOTHING_TO_EXPORT_MESSAGE};

use crate::usecases::common::UseCaseMetadata;

pub struct ExportToMarketplaces;

impl UseCaseMetadata for ExportToMarketplaces {
    const INDEX: &'static str = "u501";
    const NAME: &'static str = "export_to_marketplaces";
    const DISPLAY_NAME: &'static str = "Выгрузка в Mercado Livre и Shopee";
}
