//! Payments API Module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/payments | GET | identity |
//! | /api/payments/{id} | GET | identity |
//! | /api/payments | POST | identity |
//! | /api/payments/{id}/stripe-intent | POST | identity |
//! | /api/payments/{id}/status | PUT | admin |
//! | /api/payments/{id}/apply | PUT | admin |
//! | /api/payments/{id} | DELETE | admin |
//! | /api/payments/stripe/webhook | POST | signature |
//! | /api/payments/stripe/webhook/{token} | POST | signature |

mod handler;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    // Webhook routes authenticate by signature, not identity
    let webhook_routes = Router::new()
        .route("/stripe/webhook", post(handler::webhook))
        .route("/stripe/webhook/{token}", post(handler::webhook_with_token));

    // Identified routes: reads and creation are scoped per caller
    let scoped_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/stripe-intent", post(handler::ensure_intent));

    // Admin routes: manual state transitions and deletion
    let admin_routes = Router::new()
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/apply", put(handler::apply))
        .route("/{id}", delete(handler::delete_payment))
        .layer(middleware::from_fn(require_admin));

    webhook_routes.merge(scoped_routes).merge(admin_routes)
}
