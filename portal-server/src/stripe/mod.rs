//! Card gateway integration via REST API (no SDK dependency)
//!
//! - [`client`] - payment-intent REST client and the [`IntentGateway`] seam
//! - [`webhook`] - signature verification and payload sanitization
//! - [`types`] - wire types and gateway errors

pub mod client;
pub mod types;
pub mod webhook;

pub use client::{GatewayFactory, IntentGateway, StripeClient};
pub use types::{CreateIntentParams, GatewayError, RemoteIntent};
