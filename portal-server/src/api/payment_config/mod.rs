//! Payment Configuration API Module
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/payment-config | GET | admin |
//! | /api/payment-config/public | GET | none |
//! | /api/payment-config | POST | admin |
//! | /api/payment-config/{id} | PUT | admin |
//! | /api/payment-config/{id} | DELETE | admin |

mod handler;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payment-config", routes())
}

fn routes() -> Router<ServerState> {
    // The checkout page reads this without identity
    let public_routes = Router::new().route("/public", get(handler::get_public));

    let admin_routes = Router::new()
        .route("/", get(handler::get_active).post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete_config))
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
