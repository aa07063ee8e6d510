//! Payment Repository
//!
//! A partial unique index on `payments(order_id)` over the active statuses
//! backs the one-active-payment-per-order invariant; writers still pre-check
//! to return a friendly conflict. Completion stamps `paid_at` through
//! `COALESCE` so the first completion wins and replays cannot move it.

use super::{RepoError, RepoResult};
use shared::models::{Payment, PaymentGateway, PaymentStatus, PaymentWithOrder};
use sqlx::SqlitePool;

const PAYMENT_SELECT: &str = "SELECT id, order_id, gateway, status, amount_cents, currency, payment_method, transaction_id, remote_intent_id, gateway_response, paid_at, created_by, created_at, updated_at FROM payments";

const PAYMENT_WITH_ORDER_SELECT: &str = "SELECT p.id, p.order_id, o.order_number, p.gateway, p.status, p.amount_cents, p.currency, p.payment_method, p.transaction_id, p.remote_intent_id, p.paid_at, p.created_by, p.created_at, p.updated_at FROM payments p JOIN orders o ON p.order_id = o.id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Payment joined with its order, filtered by caller visibility.
pub async fn find_with_order_visible(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    group_id: Option<i64>,
    is_admin: bool,
) -> RepoResult<Option<PaymentWithOrder>> {
    let sql = format!(
        "{PAYMENT_WITH_ORDER_SELECT} WHERE p.id = ?1 AND (?2 OR o.owner_group_id = ?3 OR o.accepted_by_user_id = ?4)"
    );
    let row = sqlx::query_as::<_, PaymentWithOrder>(&sql)
        .bind(id)
        .bind(is_admin)
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The payment currently blocking new payments on this order, if any.
pub async fn find_active_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Option<Payment>> {
    let sql = format!(
        "{PAYMENT_SELECT} WHERE order_id = ? AND status IN ('pending', 'processing', 'completed') LIMIT 1"
    );
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(order_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_remote_intent(
    pool: &SqlitePool,
    remote_intent_id: &str,
) -> RepoResult<Option<Payment>> {
    let sql = format!("{PAYMENT_SELECT} WHERE remote_intent_id = ? LIMIT 1");
    let row = sqlx::query_as::<_, Payment>(&sql)
        .bind(remote_intent_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// List payments visible to the caller, newest first.
#[allow(clippy::too_many_arguments)]
pub async fn list(
    pool: &SqlitePool,
    order_id: Option<i64>,
    status: Option<PaymentStatus>,
    user_id: i64,
    group_id: Option<i64>,
    is_admin: bool,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PaymentWithOrder>> {
    let sql = format!(
        "{PAYMENT_WITH_ORDER_SELECT} \
         WHERE (?1 IS NULL OR p.order_id = ?1) \
           AND (?2 IS NULL OR p.status = ?2) \
           AND (?3 OR o.owner_group_id = ?4 OR o.accepted_by_user_id = ?5) \
         ORDER BY p.created_at DESC LIMIT ?6 OFFSET ?7"
    );
    let rows = sqlx::query_as::<_, PaymentWithOrder>(&sql)
        .bind(order_id)
        .bind(status)
        .bind(is_admin)
        .bind(group_id)
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    order_id: i64,
    gateway: PaymentGateway,
    amount_cents: i64,
    currency: &str,
    payment_method: Option<&str>,
    created_by: Option<i64>,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO payments (id, order_id, gateway, status, amount_cents, currency, payment_method, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, 'pending', ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(order_id)
    .bind(gateway)
    .bind(amount_cents)
    .bind(currency)
    .bind(payment_method)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payment".into()))
}

/// Manual status transition. Stamps `paid_at` once when the new status is
/// `completed`; `transaction_id` and `gateway_response` overwrite only when
/// provided.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: PaymentStatus,
    transaction_id: Option<&str>,
    gateway_response: Option<&str>,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payments SET status = ?1, transaction_id = COALESCE(?2, transaction_id), gateway_response = COALESCE(?3, gateway_response), paid_at = CASE WHEN ?1 = 'completed' THEN COALESCE(paid_at, ?4) ELSE paid_at END, updated_at = ?4 WHERE id = ?5",
    )
    .bind(status)
    .bind(transaction_id)
    .bind(gateway_response)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")))
}

/// Record an out-of-band payment as completed.
pub async fn apply_completed(
    pool: &SqlitePool,
    id: i64,
    transaction_id: Option<&str>,
    payment_method: Option<&str>,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payments SET status = 'completed', paid_at = COALESCE(paid_at, ?1), transaction_id = COALESCE(?2, transaction_id), payment_method = COALESCE(?3, payment_method), updated_at = ?1 WHERE id = ?4",
    )
    .bind(now)
    .bind(transaction_id)
    .bind(payment_method)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")))
}

/// Persist a remote intent after the gateway call succeeded.
///
/// Moves the payment onto the card gateway and refreshes the resolved
/// amount. A payment that already completed keeps its status.
pub async fn attach_remote_intent(
    pool: &SqlitePool,
    id: i64,
    amount_cents: i64,
    currency: &str,
    remote_intent_id: &str,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payments SET gateway = 'card', amount_cents = ?1, currency = ?2, remote_intent_id = ?3, status = CASE WHEN status = 'completed' THEN status ELSE 'pending' END, updated_at = ?4 WHERE id = ?5",
    )
    .bind(amount_cents)
    .bind(currency)
    .bind(remote_intent_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")))
}

/// Apply a gateway success event.
///
/// Idempotent: the first completion stamps `paid_at` and the receipt
/// reference; replays refresh only the stored payload.
pub async fn complete_from_event(
    pool: &SqlitePool,
    id: i64,
    amount_cents: Option<i64>,
    currency: Option<&str>,
    transaction_id: Option<&str>,
    gateway_response: &str,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payments SET gateway = 'card', status = 'completed', amount_cents = COALESCE(?1, amount_cents), currency = COALESCE(?2, currency), transaction_id = COALESCE(transaction_id, ?3), gateway_response = ?4, paid_at = COALESCE(paid_at, ?5), updated_at = ?5 WHERE id = ?6",
    )
    .bind(amount_cents)
    .bind(currency)
    .bind(transaction_id)
    .bind(gateway_response)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Payment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")))
}

/// Apply a gateway failure event. A completed payment never regresses: the
/// status guard lives in the WHERE clause, and a late failure leaves the row
/// untouched. `paid_at` is never touched here.
pub async fn fail_from_event(
    pool: &SqlitePool,
    id: i64,
    gateway_response: &str,
) -> RepoResult<Payment> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE payments SET gateway = 'card', status = 'failed', gateway_response = ?1, updated_at = ?2 WHERE id = ?3 AND status != 'completed'",
    )
    .bind(gateway_response)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        // Zero rows means missing or already completed; the re-fetch tells
        // them apart and returns the completed row as-is
        return find_by_id(pool, id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment {id} not found")))
}

/// Delete a payment; the status guard lives in the WHERE clause so a
/// concurrent transition cannot race the delete.
pub async fn delete_deletable(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "DELETE FROM payments WHERE id = ? AND status IN ('pending', 'failed', 'cancelled')",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
