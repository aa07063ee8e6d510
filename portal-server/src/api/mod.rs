//! API Route Modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`payments`] - payment lifecycle, intent reconciliation, gateway webhook
//! - [`payment_config`] - gateway configuration admin + public projection

pub mod health;
pub mod payment_config;
pub mod payments;

// Re-export common types for handlers
pub use crate::utils::AppResult;
