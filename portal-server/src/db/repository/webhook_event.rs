//! Processed Webhook Event Repository
//!
//! Durable dedup ledger for gateway events. The `event_id` primary key is the
//! serialization point: `INSERT OR IGNORE` either claims the event or tells
//! the caller someone else already has it.

use super::RepoResult;
use shared::models::WebhookEventRecord;
use sqlx::SqlitePool;

const EVENT_SELECT: &str = "SELECT event_id, event_type, payment_id, payload, received_at, processed_at FROM processed_webhook_events";

pub async fn find_by_event_id(
    pool: &SqlitePool,
    event_id: &str,
) -> RepoResult<Option<WebhookEventRecord>> {
    let sql = format!("{EVENT_SELECT} WHERE event_id = ?");
    let row = sqlx::query_as::<_, WebhookEventRecord>(&sql)
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Atomically claim an event id. Returns `true` when this caller inserted the
/// row; `false` means another request holds (or already processed) it.
pub async fn claim(
    pool: &SqlitePool,
    event_id: &str,
    event_type: &str,
    payment_id: Option<i64>,
    payload: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO processed_webhook_events (event_id, event_type, payment_id, payload, received_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(event_id)
    .bind(event_type)
    .bind(payment_id)
    .bind(payload)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Stamp an event as fully applied. `received_at` is never rewritten, so a
/// recovery pass keeps the original arrival time.
pub async fn mark_processed(
    pool: &SqlitePool,
    event_id: &str,
    payment_id: Option<i64>,
    payload: Option<&str>,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE processed_webhook_events SET processed_at = ?1, payment_id = COALESCE(?2, payment_id), payload = COALESCE(?3, payload) WHERE event_id = ?4",
    )
    .bind(now)
    .bind(payment_id)
    .bind(payload)
    .bind(event_id)
    .execute(pool)
    .await?;
    Ok(())
}
