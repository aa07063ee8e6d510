//! Payment Intent Reconciler
//!
//! `ensure_remote_intent` is idempotent: call it as often as the checkout
//! page reloads and it converges the local payment record and the remote
//! gateway intent onto the order's resolved amount. Local state persists only
//! after the remote call succeeded, so a gateway failure leaves the record
//! untouched.

use shared::models::{IntentHandle, PaymentConfig};
use shared::{AppError, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::{order, payment, payment_config};
use crate::order_total;
use crate::stripe::{CreateIntentParams, GatewayError, GatewayFactory, IntentGateway};

pub async fn ensure_remote_intent(
    pool: &SqlitePool,
    gateways: &GatewayFactory,
    user: &CurrentUser,
    payment_id: i64,
) -> Result<IntentHandle, AppError> {
    let config = payment_config::find_active(pool)
        .await?
        .filter(|c| c.card_enabled())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::GatewayDisabled, "Card payments are not enabled")
        })?;
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::GatewayNotConfigured))?;
    if config.publishable_key.as_deref().is_none_or(str::is_empty) {
        return Err(AppError::new(ErrorCode::GatewayNotConfigured));
    }

    let client = gateways.client(&api_key)?;
    ensure_with_gateway(pool, client.as_ref(), &config, user, payment_id).await
}

/// Reconciliation against an injected gateway; tests drive this with a fake.
pub(crate) async fn ensure_with_gateway(
    pool: &SqlitePool,
    gateway: &dyn IntentGateway,
    config: &PaymentConfig,
    user: &CurrentUser,
    payment_id: i64,
) -> Result<IntentHandle, AppError> {
    let record = payment::find_with_order_visible(
        pool,
        payment_id,
        user.id,
        user.group_id,
        user.is_admin(),
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::PaymentNotFound))?;

    let order = order::find_by_id(pool, record.order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    // Amounts drift while an order is being edited; re-resolve every time
    let total = order_total::resolve(&order);
    if total.amount_cents <= 0 {
        return Err(AppError::with_message(
            ErrorCode::OrderAmountUnresolved,
            format!("Order {} total cannot be determined", order.order_number),
        ));
    }

    let existing = match record.remote_intent_id.as_deref() {
        Some(intent_id) => match gateway.retrieve_intent(intent_id).await {
            Ok(remote) => Some(remote),
            // Vanished remotely (deleted, wrong account): start over
            Err(GatewayError::RemoteMissing) => None,
            Err(e) => return Err(gateway_error(e)),
        },
        None => None,
    };

    let intent = match existing {
        Some(remote) if !remote.is_terminal() => {
            if remote.amount != total.amount_cents
                || !remote.currency.eq_ignore_ascii_case(&total.currency)
            {
                tracing::info!(
                    "Intent {} drifted ({} {} vs {} {}), updating",
                    remote.id,
                    remote.amount,
                    remote.currency,
                    total.amount_cents,
                    total.currency
                );
                gateway
                    .update_intent_amount(&remote.id, total.amount_cents, &total.currency)
                    .await
                    .map_err(gateway_error)?
            } else {
                remote
            }
        }
        // Absent or already succeeded/canceled remotely: a fresh intent
        _ => {
            let params = CreateIntentParams {
                amount_cents: total.amount_cents,
                currency: total.currency.clone(),
                payment_id: record.id,
                order_id: order.id,
                order_number: order.order_number.clone(),
                user_id: user.id,
                group_id: user.group_id,
            };
            gateway.create_intent(&params).await.map_err(gateway_error)?
        }
    };

    let updated = payment::attach_remote_intent(
        pool,
        record.id,
        total.amount_cents,
        &total.currency,
        &intent.id,
    )
    .await?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::GatewayUnavailable,
            "Gateway returned no client secret",
        )
    })?;
    let publishable_key = config
        .publishable_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::GatewayNotConfigured))?;

    Ok(IntentHandle {
        client_secret,
        publishable_key,
        intent_id: intent.id,
        payment_id: updated.id,
        amount_cents: updated.amount_cents,
        currency: updated.currency,
    })
}

fn gateway_error(err: GatewayError) -> AppError {
    match err {
        GatewayError::RemoteMissing => AppError::with_message(
            ErrorCode::GatewayUnavailable,
            "Gateway object disappeared during reconciliation",
        ),
        GatewayError::Rejected(message) => {
            AppError::with_message(ErrorCode::GatewayRejected, message)
        }
        GatewayError::Unavailable(message) => {
            AppError::with_message(ErrorCode::GatewayUnavailable, message)
        }
    }
}
