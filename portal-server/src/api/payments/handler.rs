//! Payments API Handlers

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::payments::{intent, lifecycle, webhook, WebhookAck};
use crate::utils::validation::{
    validate_optional_text, MAX_METHOD_LEN, MAX_REFERENCE_LEN,
};
use crate::utils::AppResult;
use shared::models::{
    IntentHandle, Payment, PaymentApply, PaymentCreate, PaymentStatus, PaymentStatusUpdate,
    PaymentWithOrder,
};

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub order_id: Option<i64>,
    pub status: Option<PaymentStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(serde::Serialize)]
pub struct DeleteAck {
    pub success: bool,
}

/// GET /api/payments - payments visible to the caller
pub async fn list(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PaymentWithOrder>>> {
    let payments = lifecycle::list_payments(
        &state.pool,
        &current_user,
        query.order_id,
        query.status,
        query.limit,
        query.offset,
    )
    .await?;
    Ok(Json(payments))
}

/// GET /api/payments/:id - one payment with its order number
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<PaymentWithOrder>> {
    let payment = lifecycle::get_payment(&state.pool, &current_user, id).await?;
    Ok(Json(payment))
}

/// POST /api/payments - create a pending payment for an order
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    validate_optional_text(payload.payment_method.as_deref(), "paymentMethod", MAX_METHOD_LEN)?;
    let payment = lifecycle::create_payment(&state.pool, &current_user, payload).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// POST /api/payments/:id/stripe-intent - ensure a gateway intent for the payment
pub async fn ensure_intent(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<IntentHandle>> {
    let handle =
        intent::ensure_remote_intent(&state.pool, &state.gateways, &current_user, id).await?;
    Ok(Json(handle))
}

/// PUT /api/payments/:id/status - manual status transition
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentStatusUpdate>,
) -> AppResult<Json<Payment>> {
    validate_optional_text(
        payload.transaction_id.as_deref(),
        "transactionId",
        MAX_REFERENCE_LEN,
    )?;
    let payment = lifecycle::update_status(&state.pool, id, payload).await?;
    Ok(Json(payment))
}

/// PUT /api/payments/:id/apply - record an out-of-band payment as completed
pub async fn apply(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<PaymentApply>,
) -> AppResult<Json<Payment>> {
    validate_optional_text(
        payload.transaction_id.as_deref(),
        "transactionId",
        MAX_REFERENCE_LEN,
    )?;
    validate_optional_text(payload.payment_method.as_deref(), "paymentMethod", MAX_METHOD_LEN)?;
    let payment = lifecycle::apply_manual(&state.pool, id, payload).await?;
    Ok(Json(payment))
}

/// DELETE /api/payments/:id
pub async fn delete_payment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DeleteAck>> {
    lifecycle::delete_payment(&state.pool, id).await?;
    Ok(Json(DeleteAck { success: true }))
}

/// POST /api/payments/stripe/webhook
pub async fn webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    handle_webhook(state, None, headers, body).await
}

/// POST /api/payments/stripe/webhook/:token
pub async fn webhook_with_token(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    handle_webhook(state, Some(token), headers, body).await
}

async fn handle_webhook(
    state: ServerState,
    token: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());
    let ack = webhook::process_event(
        &state.pool,
        token.as_deref(),
        signature,
        &body,
        state.config.webhook_tolerance_secs,
    )
    .await?;
    Ok(Json(ack))
}
