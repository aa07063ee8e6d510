//! Order Repository (read side)
//!
//! Orders are created and managed by the wider portal; this service only
//! reads them to price payments and to scope what a caller may see.

use super::RepoResult;
use shared::models::Order;
use sqlx::SqlitePool;

const ORDER_SELECT: &str = "SELECT id, order_number, status, owner_group_id, accepted_by_user_id, parts_cents, assembly_cents, mods_cents, delivery_cents, tax_cents, discount_cents, grand_total_cents, currency, snapshot, created_at, updated_at FROM orders";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch an order only when the caller may see it.
///
/// Admins see every order; everyone else sees orders owned by their group or
/// accepted by them. A caller without a group falls back to the accepted-by
/// arm alone (the NULL bind never matches).
pub async fn find_visible(
    pool: &SqlitePool,
    id: i64,
    user_id: i64,
    group_id: Option<i64>,
    is_admin: bool,
) -> RepoResult<Option<Order>> {
    if is_admin {
        return find_by_id(pool, id).await;
    }
    let sql = format!(
        "{ORDER_SELECT} WHERE id = ?1 AND (owner_group_id = ?2 OR accepted_by_user_id = ?3)"
    );
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
