//! Gateway wire types

use serde::Deserialize;
use thiserror::Error;

/// Remote payment intent as returned by the gateway REST API
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteIntent {
    pub id: String,
    pub status: String,
    /// Amount in minor units
    pub amount: i64,
    /// Lowercase currency code
    pub currency: String,
    pub client_secret: Option<String>,
}

impl RemoteIntent {
    /// Terminal intents cannot be updated or confirmed again; the reconciler
    /// replaces them with a fresh intent.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "canceled")
    }
}

/// Parameters for creating a remote intent
#[derive(Debug, Clone)]
pub struct CreateIntentParams {
    pub amount_cents: i64,
    /// Any case; the client lowercases it on the wire
    pub currency: String,
    pub payment_id: i64,
    pub order_id: i64,
    pub order_number: String,
    pub user_id: i64,
    pub group_id: Option<i64>,
}

/// Error envelope the gateway returns on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct GatewayErrorEnvelope {
    pub error: GatewayErrorBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct GatewayErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

/// Outcome of a remote gateway call
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The referenced remote object does not exist (HTTP 404 /
    /// `resource_missing`); callers treat the intent as absent.
    #[error("remote intent not found")]
    RemoteMissing,

    /// The gateway rejected the request (4xx)
    #[error("gateway rejected request: {0}")]
    Rejected(String),

    /// The gateway could not be reached or answered 5xx
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}
