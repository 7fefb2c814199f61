use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Подпись запросов Shopee Open Platform v2.
///
/// Базовая строка: `partner_id + path + timestamp + access_token + shop_id`
/// без разделителей, HMAC-SHA256 на ключе партнёра, hex в нижнем регистре.
#[derive(Debug, Clone)]
pub struct ShopeeSigner {
    partner_id: String,
    partner_key: String,
}

impl ShopeeSigner {
    pub fn new(partner_id: impl Into<String>, partner_key: impl Into<String>) -> Self {
        Self {
            partner_id: partner_id.into(),
            partner_key: partner_key.into(),
        }
    }

    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    pub fn sign(&self, path: &str, timestamp: i64, access_token: &str, shop_id: &str) -> String {
        let base_string = format!(
            "{}{}{}{}{}",
            self.partner_id, path, timestamp, access_token, shop_id
        );
        let mut mac = HmacSha256::new_from_slice(self.partner_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(base_string.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }
}
