//! Data models
//!
//! Shared between the payments server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod order;
pub mod payment;
pub mod payment_config;
pub mod webhook_event;

// Re-exports
pub use order::*;
pub use payment::*;
pub use payment_config::*;
pub use webhook_event::*;
