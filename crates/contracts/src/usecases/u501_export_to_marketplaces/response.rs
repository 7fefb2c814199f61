use serde::{Deserialize, Serialize};

use crate::domain::a001_product::ProductId;

pub const NOTHING_TO_EXPORT_MESSAGE: &str = "No pending products to export";

/// Итог выгрузки одного товара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportResultStatus {
    Success,
    /// Хотя бы один вызов маркетплейса завершился ошибкой
    PartialError,
}

/// Результат выгрузки товара за один запуск. Не сохраняется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub product_id: ProductId,
    pub status: ExportResultStatus,
    /// Маркетплейсы, в которые товар выгружен успешно
    pub markets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            status: ExportResultStatus::Success,
            markets: Vec::new(),
            error: None,
        }
    }

    /// Зафиксировать ошибку; сообщения нескольких ошибок склеиваются через "; "
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = ExportResultStatus::PartialError;
        self.error = Some(match self.error.take() {
            Some(prev) => format!("{}; {}", prev, message),
            None => message,
        });
    }

    pub fn is_success(&self) -> bool {
        self.status == ExportResultStatus::Success
    }
}

/// Ответ на запуск выгрузки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportResponse {
    Completed { results: Vec<ExportResult> },
    NothingToExport { message: String },
}

impl ExportResponse {
    pub fn nothing_to_export() -> Self {
        Self::NothingToExport {
            message: NOTHING_TO_EXPORT_MESSAGE.to_string(),
        }
    }

    pub fn results(&self) -> &[ExportResult] {
        match self {
            Self::Completed { results } => results,
            Self::NothingToExport { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_response_shape() {
        let id = ProductId::new_v4();
        let mut failed = ExportResult::new(id);
        failed.record_error("invalid title");
        let response = ExportResponse::Completed {
            results: vec![failed],
        };

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
    }

    #[test]
    fn test_success_omits_error_field() {
        let mut ok = ExportResult::new(ProductId::new_v4());
        ok.markets.push("Mercado Livre".into());
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["status"], "success");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_nothing_to_export_shape() {
        let value = serde_json::to_value(ExportResponse::nothing_to_export()).unwrap();
        assert_eq!(value, json!({ "message": "No pending products to export" }));
    }

    #[test]
    fn test_errors_are_joined() {
        let mut result = ExportResult::new(ProductId::new_v4());
        result.record_error("a");
        result.record_error("b");
        assert_eq!(result.error.as_deref(), Some("a; b"));
    }
}
