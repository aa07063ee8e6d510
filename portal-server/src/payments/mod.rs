//! Payment Domain Logic
//!
//! Three cooperating pieces sit behind the `/api/payments` surface:
//!
//! - [`lifecycle`]: create / manual-update / manual-apply / delete, with the
//!   one-active-payment and gateway-exclusivity rules
//! - [`intent`]: the idempotent ensure-remote-intent reconciler for the card
//!   gateway
//! - [`webhook`]: signature verification, durable dedup and state transitions
//!   for gateway events

pub mod intent;
pub mod lifecycle;
pub mod webhook;


pub use intent::ensure_remote_intent;
pub use webhook::{process_event, WebhookAck};
