//! Payment Lifecycle
//!
//! Create, manual status update, manual apply, delete, and the scoped
//! list/get reads. Card-gateway payments refuse every manual mutation here;
//! their state belongs to the reconciler and the webhook processor.

use shared::models::{
    Payment, PaymentApply, PaymentCreate, PaymentGateway, PaymentStatus, PaymentStatusUpdate,
    PaymentWithOrder,
};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{order, payment, payment_config};
use crate::order_total;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// List payments visible to the caller, newest first.
pub async fn list_payments(
    pool: &SqlitePool,
    user: &CurrentUser,
    order_id: Option<i64>,
    status: Option<PaymentStatus>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<PaymentWithOrder>, AppError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    let rows = payment::list(
        pool,
        order_id,
        status,
        user.id,
        user.group_id,
        user.is_admin(),
        limit,
        offset,
    )
    .await?;
    Ok(rows)
}

pub async fn get_payment(
    pool: &SqlitePool,
    user: &CurrentUser,
    id: i64,
) -> Result<PaymentWithOrder, AppError> {
    let record = payment::find_with_order_visible(pool, id, user.id, user.group_id, user.is_admin())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    Ok(record)
}

/// Create a pending payment for an order.
///
/// The amount and currency come from [`order_total::resolve`]; an order whose
/// total cannot be determined refuses creation. At most one payment per order
/// may sit in `pending`/`processing`/`completed`.
pub async fn create_payment(
    pool: &SqlitePool,
    user: &CurrentUser,
    data: PaymentCreate,
) -> Result<Payment, AppError> {
    let order = order::find_visible(pool, data.order_id, user.id, user.group_id, user.is_admin())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if let Some(existing) = payment::find_active_by_order(pool, order.id).await? {
        return Err(AppError::new(ErrorCode::PaymentAlreadyActive)
            .with_detail("existingPaymentId", existing.id)
            .with_detail("existingStatus", existing.status.as_str()));
    }

    let total = order_total::resolve(&order);
    if total.amount_cents <= 0 {
        return Err(AppError::with_message(
            ErrorCode::OrderAmountUnresolved,
            format!("Order {} total cannot be determined", order.order_number),
        ));
    }

    let gateway = effective_gateway(pool, data.gateway).await?;
    let created = payment::create(
        pool,
        order.id,
        gateway,
        total.amount_cents,
        &total.currency,
        data.payment_method.as_deref(),
        Some(user.id),
    )
    .await?;

    tracing::info!(
        "Payment {} created for order {} ({} {} via {})",
        created.id,
        order.order_number,
        created.amount_cents,
        created.currency,
        gateway.as_str()
    );
    Ok(created)
}

/// The gateway a new payment lands on.
///
/// `card` requires an active configuration row with the card provider; a
/// `card` request with the gateway disabled degrades to `manual` silently.
async fn effective_gateway(
    pool: &SqlitePool,
    requested: Option<PaymentGateway>,
) -> Result<PaymentGateway, AppError> {
    if requested != Some(PaymentGateway::Card) {
        return Ok(PaymentGateway::Manual);
    }
    let enabled = payment_config::find_active(pool)
        .await?
        .is_some_and(|c| c.card_enabled());
    if enabled {
        Ok(PaymentGateway::Card)
    } else {
        tracing::debug!("Card gateway disabled, payment degrades to manual");
        Ok(PaymentGateway::Manual)
    }
}

/// Manual status transition.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    data: PaymentStatusUpdate,
) -> Result<Payment, AppError> {
    let existing = payment::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    if existing.gateway == PaymentGateway::Card {
        return Err(AppError::with_message(
            ErrorCode::PaymentGatewayManaged,
            "Card payments are managed by the gateway flow",
        ));
    }

    let gateway_response = data
        .gateway_response
        .as_ref()
        .map(|v| serde_json::to_string(v))
        .transpose()
        .map_err(|e| AppError::internal(format!("Failed to encode gateway response: {e}")))?;

    let updated = payment::update_status(
        pool,
        id,
        data.status,
        data.transaction_id.as_deref(),
        gateway_response.as_deref(),
    )
    .await?;
    tracing::info!("Payment {} status set to {}", id, data.status.as_str());
    Ok(updated)
}

/// Record an out-of-band payment (check, wire, cash) as completed.
///
/// Idempotent: an already-completed payment returns unchanged with no writes.
pub async fn apply_manual(
    pool: &SqlitePool,
    id: i64,
    data: PaymentApply,
) -> Result<Payment, AppError> {
    let existing = payment::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;
    if existing.gateway == PaymentGateway::Card {
        return Err(AppError::with_message(
            ErrorCode::PaymentGatewayManaged,
            "Card payments are managed by the gateway flow",
        ));
    }
    if existing.status == PaymentStatus::Completed {
        return Ok(existing);
    }

    let applied = payment::apply_completed(
        pool,
        id,
        data.transaction_id.as_deref(),
        data.payment_method.as_deref(),
    )
    .await?;
    tracing::info!("Payment {} applied as completed", id);
    Ok(applied)
}

/// Delete a payment in `pending`, `failed` or `cancelled`.
pub async fn delete_payment(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    if payment::delete_deletable(pool, id).await? {
        tracing::info!("Payment {} deleted", id);
        return Ok(());
    }
    // Zero rows affected: tell missing apart from undeletable
    match payment::find_by_id(pool, id).await? {
        Some(_) => Err(AppError::with_message(
            ErrorCode::PaymentNotDeletable,
            "Only pending, failed, or cancelled payments can be deleted",
        )),
        None => Err(AppError::new(ErrorCode::PaymentNotFound)),
    }
}
