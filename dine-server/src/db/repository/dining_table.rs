//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, qr_payload};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, number, qr_payload, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY number"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    exec: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await?;
    Ok(row)
}

pub async fn find_by_number(pool: &SqlitePool, number: &str) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE number = ? LIMIT 1"
    ))
    .bind(number)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Create a table; the QR payload is derived from the new id
pub async fn create(pool: &SqlitePool, number: &str, origin: &str) -> RepoResult<DiningTable> {
    let number = number.trim();
    if find_by_number(pool, number).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Table '{number}' already exists"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO dining_table (id, number, qr_payload, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(number)
        .bind(qr_payload(origin, id))
        .bind(now)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

pub async fn update_number(pool: &SqlitePool, id: i64, number: &str) -> RepoResult<DiningTable> {
    let number = number.trim();
    if let Some(found) = find_by_number(pool, number).await?
        && found.id != id
    {
        return Err(RepoError::Duplicate(format!(
            "Table '{number}' already exists"
        )));
    }

    let rows = sqlx::query("UPDATE dining_table SET number = ? WHERE id = ?")
        .bind(number)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dining table {id} not found")))
}

/// Rewrite stored QR payloads whose origin differs from `origin`
///
/// Returns the number of rows changed.
pub async fn refresh_qr_payloads(pool: &SqlitePool, origin: &str) -> RepoResult<u64> {
    let tables = find_all(pool).await?;
    let mut changed = 0;
    for table in tables {
        let expected = qr_payload(origin, table.id);
        if table.qr_payload != expected {
            sqlx::query("UPDATE dining_table SET qr_payload = ? WHERE id = ?")
                .bind(&expected)
                .bind(table.id)
                .execute(pool)
                .await?;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Delete a table that has no orders
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let order_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE table_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if order_count > 0 {
        return Err(RepoError::Validation(format!(
            "Table {id} has {order_count} orders"
        )));
    }

    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
