//! Table Bill Repository

use super::RepoResult;
use shared::models::TableBill;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqliteExecutor};

const COLUMNS: &str =
    "id, table_id, order_ids, subtotal, total_tax, final_amount, breakdown, approved_by, created_at";

pub async fn insert(conn: &mut SqliteConnection, bill: &TableBill) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO table_bill (id, table_id, order_ids, subtotal, total_tax, final_amount, breakdown, approved_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(bill.id)
    .bind(bill.table_id)
    .bind(Json(&bill.order_ids))
    .bind(bill.subtotal)
    .bind(bill.total_tax)
    .bind(bill.final_amount)
    .bind(Json(&bill.breakdown))
    .bind(&bill.approved_by)
    .bind(bill.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<TableBill>> {
    let row = sqlx::query_as::<_, TableBill>(&format!(
        "SELECT {COLUMNS} FROM table_bill WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn find_by_table<'e>(
    exec: impl SqliteExecutor<'e>,
    table_id: i64,
) -> RepoResult<Vec<TableBill>> {
    let rows = sqlx::query_as::<_, TableBill>(&format!(
        "SELECT {COLUMNS} FROM table_bill WHERE table_id = ? ORDER BY created_at DESC"
    ))
    .bind(table_id)
    .fetch_all(exec)
    .await?;
    Ok(rows)
}
