//! Processed Webhook Event Model
//!
//! Durable dedup ledger for gateway webhooks. The gateway event id is the
//! primary key; claiming a row via insert-if-absent is what serializes
//! concurrent deliveries of the same event.

use serde::{Deserialize, Serialize};

/// Durable record of a received gateway webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct WebhookEventRecord {
    /// Gateway event id, e.g. `evt_1NG8Du2eZvKYlo2C`
    pub event_id: String,
    pub event_type: String,
    /// Local payment the event applied to, if one was found
    pub payment_id: Option<i64>,
    /// Sanitized event payload, JSON stored as text
    pub payload: Option<String>,
    pub received_at: i64,
    /// Set once the event's side effects have been applied
    pub processed_at: Option<i64>,
}

impl WebhookEventRecord {
    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }
}
