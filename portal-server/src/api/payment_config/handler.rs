//! Payment Configuration API Handlers
//!
//! Responses are projections: the admin view reduces secrets to presence
//! flags, the public view carries only what the checkout page needs. Raw
//! `api_key`/`webhook_secret` values never serialize outward.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::payment_config;
use crate::utils::validation::{
    validate_currency_list, validate_optional_text, MAX_EMBED_LEN, MAX_URL_LEN,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    PaymentConfigCreate, PaymentConfigPublic, PaymentConfigUpdate, PaymentConfigView,
};
use shared::ErrorCode;

#[derive(serde::Serialize)]
pub struct DeleteAck {
    pub success: bool,
}

/// GET /api/payment-config - active configuration for the admin screen
pub async fn get_active(
    State(state): State<ServerState>,
) -> AppResult<Json<PaymentConfigView>> {
    let view = match payment_config::find_active(&state.pool).await? {
        Some(config) => PaymentConfigView::from(&config),
        None => PaymentConfigView::default_inactive(),
    };
    Ok(Json(view))
}

/// GET /api/payment-config/public - projection for the checkout page
pub async fn get_public(
    State(state): State<ServerState>,
) -> AppResult<Json<PaymentConfigPublic>> {
    let config = payment_config::find_active(&state.pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentConfigNotFound))?;
    Ok(Json(PaymentConfigPublic::from(&config)))
}

/// POST /api/payment-config - insert a new active configuration
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PaymentConfigCreate>,
) -> AppResult<(StatusCode, Json<PaymentConfigView>)> {
    validate_optional_text(payload.gateway_url.as_deref(), "gatewayUrl", MAX_URL_LEN)?;
    validate_optional_text(payload.embed_code.as_deref(), "embedCode", MAX_EMBED_LEN)?;
    if let Some(currencies) = &payload.supported_currencies {
        validate_currency_list(currencies)?;
    }
    let config = payment_config::create_active(&state.pool, payload, Some(current_user.id)).await?;
    tracing::info!(
        "Payment configuration {} created by user {}",
        config.id,
        current_user.id
    );
    Ok((StatusCode::CREATED, Json(PaymentConfigView::from(&config))))
}

/// PUT /api/payment-config/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentConfigUpdate>,
) -> AppResult<Json<PaymentConfigView>> {
    validate_optional_text(payload.gateway_url.as_deref(), "gatewayUrl", MAX_URL_LEN)?;
    validate_optional_text(payload.embed_code.as_deref(), "embedCode", MAX_EMBED_LEN)?;
    if let Some(currencies) = &payload.supported_currencies {
        validate_currency_list(currencies)?;
    }
    let config = payment_config::update(&state.pool, id, payload).await?;
    Ok(Json(PaymentConfigView::from(&config)))
}

/// DELETE /api/payment-config/:id
pub async fn delete_config(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteAck>> {
    if !payment_config::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PaymentConfigNotFound));
    }
    Ok(Json(DeleteAck { success: true }))
}
