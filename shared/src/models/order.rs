//! Order Model (read side)
//!
//! Order CRUD lives in the main portal service; the payments server only
//! reads orders to price and scope payments.

use serde::{Deserialize, Serialize};

/// Dealer order with integer-cent pricing components
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    /// Portal order number, e.g. `NJ-101-042425`
    pub order_number: String,
    /// Portal workflow status, opaque to the payments server
    pub status: String,
    /// Dealer group that owns the order
    pub owner_group_id: Option<i64>,
    /// Staff user who accepted the order
    pub accepted_by_user_id: Option<i64>,
    pub parts_cents: Option<i64>,
    pub assembly_cents: Option<i64>,
    pub mods_cents: Option<i64>,
    pub delivery_cents: Option<i64>,
    pub tax_cents: Option<i64>,
    pub discount_cents: Option<i64>,
    /// Authoritative total when present and positive
    pub grand_total_cents: Option<i64>,
    pub currency: Option<String>,
    /// Legacy pricing blob, JSON stored as text
    pub snapshot: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
