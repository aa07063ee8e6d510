//! Payment Model

use serde::{Deserialize, Serialize};

/// Which system manages a payment's lifecycle
///
/// `manual` payments are mutated by staff through the portal; `card` payments
/// are owned by the gateway flow and refuse manual status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentGateway {
    Manual,
    Card,
}

impl Default for PaymentGateway {
    fn default() -> Self {
        Self::Manual
    }
}

impl PaymentGateway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Card => "card",
        }
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Statuses that block a new payment on the same order
    pub fn blocks_new_payment(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing | Self::Completed)
    }

    /// Statuses that permit deletion of the record
    pub fn is_deletable(&self) -> bool {
        matches!(self, Self::Pending | Self::Failed | Self::Cancelled)
    }
}

/// Payment record for a dealer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub gateway: PaymentGateway,
    pub status: PaymentStatus,
    /// Amount in minor units (cents)
    pub amount_cents: i64,
    pub currency: String,
    /// Free-form method label (`check`, `wire`, `card`, ...)
    pub payment_method: Option<String>,
    /// External receipt/charge reference
    pub transaction_id: Option<String>,
    /// Gateway intent id, set once the card flow starts
    pub remote_intent_id: Option<String>,
    /// Sanitized gateway payload, JSON stored as text
    pub gateway_response: Option<String>,
    /// Stamped once on first completion
    pub paid_at: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payment joined with its order number (for list views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithOrder {
    pub id: i64,
    pub order_id: i64,
    pub order_number: String,
    pub gateway: PaymentGateway,
    pub status: PaymentStatus,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub remote_intent_id: Option<String>,
    pub paid_at: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub order_id: i64,
    /// Requested gateway; the effective gateway may degrade to `manual`
    pub gateway: Option<PaymentGateway>,
    pub payment_method: Option<String>,
}

/// Manual status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    /// Free-form gateway/processor payload, stored as JSON text
    pub gateway_response: Option<serde_json::Value>,
}

/// Manual apply payload (record an out-of-band payment as completed)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentApply {
    pub transaction_id: Option<String>,
    pub payment_method: Option<String>,
}

/// Response for the ensure-intent endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentHandle {
    pub client_secret: String,
    pub publishable_key: String,
    pub intent_id: String,
    pub payment_id: i64,
    pub amount_cents: i64,
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_blocks_new_payment() {
        assert!(PaymentStatus::Pending.blocks_new_payment());
        assert!(PaymentStatus::Processing.blocks_new_payment());
        assert!(PaymentStatus::Completed.blocks_new_payment());
        assert!(!PaymentStatus::Failed.blocks_new_payment());
        assert!(!PaymentStatus::Cancelled.blocks_new_payment());
    }

    #[test]
    fn test_status_is_deletable() {
        assert!(PaymentStatus::Pending.is_deletable());
        assert!(PaymentStatus::Failed.is_deletable());
        assert!(PaymentStatus::Cancelled.is_deletable());
        assert!(!PaymentStatus::Processing.is_deletable());
        assert!(!PaymentStatus::Completed.is_deletable());
    }

    #[test]
    fn test_gateway_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentGateway::Card).unwrap(),
            "\"card\""
        );
        let g: PaymentGateway = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(g, PaymentGateway::Manual);
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completed).unwrap(),
            "\"completed\""
        );
        let s: PaymentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(s, PaymentStatus::Cancelled);
    }

    #[test]
    fn test_payment_serializes_camel_case() {
        let payment = Payment {
            id: 1,
            order_id: 2,
            gateway: PaymentGateway::Manual,
            status: PaymentStatus::Pending,
            amount_cents: 145000,
            currency: "USD".to_string(),
            payment_method: None,
            transaction_id: None,
            remote_intent_id: None,
            gateway_response: None,
            paid_at: None,
            created_by: Some(7),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&payment).unwrap();
        assert!(json.contains("\"orderId\":2"));
        assert!(json.contains("\"amountCents\":145000"));
        assert!(json.contains("\"paidAt\":null"));
    }
}
