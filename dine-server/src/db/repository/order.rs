//! Order Repository
//!
//! State-changing updates are compare-and-swap on `status`: they return
//! whether the row matched so callers can detect a concurrent transition.

use super::RepoResult;
use shared::models::{LineItem, Order, OrderQuery, OrderStatus};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, table_id, customer_phone, items, total_amount, tax_amount, bill_amount, final_amount, bill_id, status, created_at, updated_at";

pub async fn insert<'e>(exec: impl SqliteExecutor<'e>, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, table_id, customer_phone, items, total_amount, tax_amount, bill_amount, final_amount, bill_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(order.id)
    .bind(order.table_id)
    .bind(&order.customer_phone)
    .bind(Json(&order.items))
    .bind(order.total_amount)
    .bind(order.tax_amount)
    .bind(order.bill_amount)
    .bind(order.final_amount)
    .bind(order.bill_id)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

/// Staff listing, newest first
pub async fn find_all(pool: &SqlitePool, query: &OrderQuery) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR table_id = ?2) ORDER BY created_at DESC"
    ))
    .bind(query.status)
    .bind(query.table_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// A customer's orders, newest first
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE customer_phone = ? ORDER BY created_at DESC"
    ))
    .bind(phone)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Pending orders of a table, oldest first
pub async fn find_pending_by_table<'e>(
    exec: impl SqliteExecutor<'e>,
    table_id: i64,
) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE table_id = ? AND status = 'pending' ORDER BY created_at, id"
    ))
    .bind(table_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

/// Orders attached to a table bill
pub async fn find_by_bill<'e>(exec: impl SqliteExecutor<'e>, bill_id: i64) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE bill_id = ? ORDER BY created_at, id"
    ))
    .bind(bill_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

/// Figures written onto each order when its table bill is approved
#[derive(Debug, Clone, Copy)]
pub struct ApprovalAmounts {
    pub bill_id: i64,
    pub bill_amount: f64,
    pub tax_amount: f64,
    pub final_amount: f64,
}

/// `pending -> approved`; false when the order was no longer pending
pub async fn approve_if_pending<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    amounts: ApprovalAmounts,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = 'approved', bill_id = ?1, bill_amount = ?2, tax_amount = ?3, final_amount = ?4, updated_at = ?5 WHERE id = ?6 AND status = 'pending'",
    )
    .bind(amounts.bill_id)
    .bind(amounts.bill_amount)
    .bind(amounts.tax_amount)
    .bind(amounts.final_amount)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Conditional status step `from -> to`; false when the row was not in `from`
pub async fn transition_status<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to)
    .bind(now)
    .bind(id)
    .bind(from)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Replace items and total of a pending order; false when no longer pending
pub async fn update_items_if_pending<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
    items: &[LineItem],
    total_amount: f64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET items = ?1, total_amount = ?2, updated_at = ?3 WHERE id = ?4 AND status = 'pending'",
    )
    .bind(Json(items))
    .bind(total_amount)
    .bind(now)
    .bind(id)
    .execute(exec)
    .await?;
    Ok(rows.rows_affected() == 1)
}
