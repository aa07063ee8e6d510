//! Payment Configuration Model
//!
//! One row may be active at a time; it decides whether card payments are
//! available and carries the gateway credentials. Secret fields never
//! serialize outward.

use serde::{Deserialize, Serialize};

/// Provider identifier for the card gateway
pub const CARD_PROVIDER: &str = "stripe";

/// Gateway configuration row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub id: i64,
    pub gateway_provider: String,
    pub gateway_url: Option<String>,
    pub embed_code: Option<String>,
    /// Secret API credential; kept out of every response body
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Browser-side credential returned to the checkout page
    pub publishable_key: Option<String>,
    /// HMAC signing secret for webhooks; kept out of every response body
    #[serde(skip_serializing, default)]
    pub webhook_secret: Option<String>,
    /// Optional extra path segment the webhook URL must carry
    #[serde(skip_serializing, default)]
    pub webhook_path_token: Option<String>,
    pub is_active: bool,
    /// JSON array stored as text, e.g. `["USD"]`
    pub supported_currencies: String,
    /// JSON object stored as text
    pub settings: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PaymentConfig {
    /// Whether this row enables the card gateway
    pub fn card_enabled(&self) -> bool {
        self.is_active && self.gateway_provider == CARD_PROVIDER
    }

    /// Parse the stored currency list, falling back to `["USD"]`
    pub fn supported_currencies_list(&self) -> Vec<String> {
        serde_json::from_str(&self.supported_currencies)
            .unwrap_or_else(|_| vec!["USD".to_string()])
    }

    /// Parse the stored settings object, falling back to `{}`
    pub fn settings_value(&self) -> serde_json::Value {
        serde_json::from_str(&self.settings).unwrap_or_else(|_| serde_json::json!({}))
    }
}

/// Public projection for the checkout page (no identity required)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigPublic {
    pub gateway_provider: String,
    pub gateway_url: Option<String>,
    pub embed_code: Option<String>,
    pub publishable_key: Option<String>,
    pub supported_currencies: Vec<String>,
}

impl From<&PaymentConfig> for PaymentConfigPublic {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            gateway_provider: config.gateway_provider.clone(),
            gateway_url: config.gateway_url.clone(),
            embed_code: config.embed_code.clone(),
            publishable_key: config.publishable_key.clone(),
            supported_currencies: config.supported_currencies_list(),
        }
    }
}

/// Admin view of the active configuration
///
/// Mirrors what the admin screen edits, with parsed currency/settings values
/// and secrets reduced to presence flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigView {
    pub id: Option<i64>,
    pub gateway_provider: String,
    pub gateway_url: Option<String>,
    pub embed_code: Option<String>,
    pub publishable_key: Option<String>,
    pub has_api_key: bool,
    pub has_webhook_secret: bool,
    pub is_active: bool,
    pub supported_currencies: Vec<String>,
    pub settings: serde_json::Value,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl PaymentConfigView {
    /// Virtual defaults shown when no configuration row exists yet
    pub fn default_inactive() -> Self {
        Self {
            id: None,
            gateway_provider: CARD_PROVIDER.to_string(),
            gateway_url: None,
            embed_code: None,
            publishable_key: None,
            has_api_key: false,
            has_webhook_secret: false,
            is_active: false,
            supported_currencies: vec!["USD".to_string()],
            settings: serde_json::json!({}),
            created_at: None,
            updated_at: None,
        }
    }
}

impl From<&PaymentConfig> for PaymentConfigView {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            id: Some(config.id),
            gateway_provider: config.gateway_provider.clone(),
            gateway_url: config.gateway_url.clone(),
            embed_code: config.embed_code.clone(),
            publishable_key: config.publishable_key.clone(),
            has_api_key: config.api_key.as_deref().is_some_and(|k| !k.is_empty()),
            has_webhook_secret: config
                .webhook_secret
                .as_deref()
                .is_some_and(|s| !s.is_empty()),
            is_active: config.is_active,
            supported_currencies: config.supported_currencies_list(),
            settings: config.settings_value(),
            created_at: Some(config.created_at),
            updated_at: Some(config.updated_at),
        }
    }
}

/// Create configuration payload (created rows become the active one)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigCreate {
    pub gateway_provider: Option<String>,
    pub gateway_url: Option<String>,
    pub embed_code: Option<String>,
    pub api_key: Option<String>,
    pub publishable_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub webhook_path_token: Option<String>,
    pub supported_currencies: Option<Vec<String>>,
    pub settings: Option<serde_json::Value>,
}

/// Partial update payload; `None` fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigUpdate {
    pub gateway_provider: Option<String>,
    pub gateway_url: Option<String>,
    pub embed_code: Option<String>,
    pub api_key: Option<String>,
    pub publishable_key: Option<String>,
    pub webhook_secret: Option<String>,
    pub webhook_path_token: Option<String>,
    pub supported_currencies: Option<Vec<String>>,
    pub settings: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PaymentConfig {
        PaymentConfig {
            id: 1,
            gateway_provider: "stripe".to_string(),
            gateway_url: Some("https://dashboard.stripe.com".to_string()),
            embed_code: None,
            api_key: Some("sk_test_abc".to_string()),
            publishable_key: Some("pk_test_abc".to_string()),
            webhook_secret: Some("whsec_abc".to_string()),
            webhook_path_token: None,
            is_active: true,
            supported_currencies: "[\"USD\"]".to_string(),
            settings: "{}".to_string(),
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_secrets_never_serialize() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("sk_test_abc"));
        assert!(!json.contains("whsec_abc"));
        assert!(json.contains("pk_test_abc"));
    }

    #[test]
    fn test_card_enabled() {
        let mut config = sample();
        assert!(config.card_enabled());

        config.is_active = false;
        assert!(!config.card_enabled());

        config.is_active = true;
        config.gateway_provider = "paypal".to_string();
        assert!(!config.card_enabled());
    }

    #[test]
    fn test_currency_list_fallback() {
        let mut config = sample();
        config.supported_currencies = "not json".to_string();
        assert_eq!(config.supported_currencies_list(), vec!["USD".to_string()]);
    }

    #[test]
    fn test_view_masks_secrets() {
        let view = PaymentConfigView::from(&sample());
        assert!(view.has_api_key);
        assert!(view.has_webhook_secret);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("sk_test_abc"));
        assert!(!json.contains("whsec_abc"));
    }

    #[test]
    fn test_default_inactive_view() {
        let view = PaymentConfigView::default_inactive();
        assert!(!view.is_active);
        assert_eq!(view.gateway_provider, "stripe");
        assert_eq!(view.supported_currencies, vec!["USD".to_string()]);
    }
}
