//! Payment Configuration Repository
//!
//! At most one row is active; writers that activate a row deactivate the
//! rest inside the same transaction.

use super::{RepoError, RepoResult};
use shared::models::{PaymentConfig, PaymentConfigCreate, PaymentConfigUpdate, CARD_PROVIDER};
use sqlx::SqlitePool;

// Legacy imports may carry NULL activation flags; resolve the tri-state to a
// concrete boolean here so nothing past this module ever sees it.
const CONFIG_SELECT: &str = "SELECT id, gateway_provider, gateway_url, embed_code, api_key, publishable_key, webhook_secret, webhook_path_token, COALESCE(is_active, 0) AS is_active, supported_currencies, settings, created_by, created_at, updated_at FROM payment_config";

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Option<PaymentConfig>> {
    let sql = format!("{CONFIG_SELECT} WHERE COALESCE(is_active, 0) = 1 ORDER BY updated_at DESC LIMIT 1");
    let row = sqlx::query_as::<_, PaymentConfig>(&sql)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<PaymentConfig>> {
    let sql = format!("{CONFIG_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, PaymentConfig>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a new configuration row as the active one, deactivating the rest.
pub async fn create_active(
    pool: &SqlitePool,
    data: PaymentConfigCreate,
    created_by: Option<i64>,
) -> RepoResult<PaymentConfig> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let provider = data
        .gateway_provider
        .unwrap_or_else(|| CARD_PROVIDER.to_string());
    let currencies = data
        .supported_currencies
        .map(|c| serde_json::to_string(&c).unwrap_or_else(|_| "[\"USD\"]".to_string()))
        .unwrap_or_else(|| "[\"USD\"]".to_string());
    let settings = data
        .settings
        .map(|s| s.to_string())
        .unwrap_or_else(|| "{}".to_string());

    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE payment_config SET is_active = 0, updated_at = ?1 WHERE COALESCE(is_active, 0) = 1")
        .bind(now)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "INSERT INTO payment_config (id, gateway_provider, gateway_url, embed_code, api_key, publishable_key, webhook_secret, webhook_path_token, is_active, supported_currencies, settings, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(&provider)
    .bind(&data.gateway_url)
    .bind(&data.embed_code)
    .bind(&data.api_key)
    .bind(&data.publishable_key)
    .bind(&data.webhook_secret)
    .bind(&data.webhook_path_token)
    .bind(&currencies)
    .bind(&settings)
    .bind(created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create payment config".into()))
}

/// Partial update; activating a row deactivates the others first.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: PaymentConfigUpdate,
) -> RepoResult<PaymentConfig> {
    let now = shared::util::now_millis();
    let currencies = data
        .supported_currencies
        .map(|c| serde_json::to_string(&c).unwrap_or_else(|_| "[\"USD\"]".to_string()));
    let settings = data.settings.map(|s| s.to_string());

    let mut tx = pool.begin().await?;
    if data.is_active == Some(true) {
        sqlx::query("UPDATE payment_config SET is_active = 0, updated_at = ?1 WHERE id != ?2 AND COALESCE(is_active, 0) = 1")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    let rows = sqlx::query(
        "UPDATE payment_config SET gateway_provider = COALESCE(?1, gateway_provider), gateway_url = COALESCE(?2, gateway_url), embed_code = COALESCE(?3, embed_code), api_key = COALESCE(?4, api_key), publishable_key = COALESCE(?5, publishable_key), webhook_secret = COALESCE(?6, webhook_secret), webhook_path_token = COALESCE(?7, webhook_path_token), supported_currencies = COALESCE(?8, supported_currencies), settings = COALESCE(?9, settings), is_active = COALESCE(?10, is_active, 0), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.gateway_provider)
    .bind(&data.gateway_url)
    .bind(&data.embed_code)
    .bind(&data.api_key)
    .bind(&data.publishable_key)
    .bind(&data.webhook_secret)
    .bind(&data.webhook_path_token)
    .bind(&currencies)
    .bind(&settings)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Payment config {id} not found"
        )));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Payment config {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM payment_config WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
