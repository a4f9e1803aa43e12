//! Tax Configuration Repository

use super::{RepoError, RepoResult};
use shared::models::{TaxConfig, TaxConfigCreate, TaxConfigUpdate};
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str = "id, name, percentage, is_active, sort_order";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<TaxConfig>> {
    let rows = sqlx::query_as::<_, TaxConfig>(&format!(
        "SELECT {COLUMNS} FROM tax_config ORDER BY sort_order, id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active taxes in application order
pub async fn find_active<'e>(exec: impl SqliteExecutor<'e>) -> RepoResult<Vec<TaxConfig>> {
    let rows = sqlx::query_as::<_, TaxConfig>(&format!(
        "SELECT {COLUMNS} FROM tax_config WHERE is_active = 1 ORDER BY sort_order, id"
    ))
    .fetch_all(exec)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<TaxConfig>> {
    let row = sqlx::query_as::<_, TaxConfig>(&format!(
        "SELECT {COLUMNS} FROM tax_config WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: TaxConfigCreate) -> RepoResult<TaxConfig> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO tax_config (id, name, percentage, is_active, sort_order) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(data.percentage)
    .bind(data.is_active.unwrap_or(true))
    .bind(data.sort_order.unwrap_or(0))
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tax".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: TaxConfigUpdate) -> RepoResult<TaxConfig> {
    let rows = sqlx::query(
        "UPDATE tax_config SET name = COALESCE(?1, name), percentage = COALESCE(?2, percentage), is_active = COALESCE(?3, is_active), sort_order = COALESCE(?4, sort_order) WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.percentage)
    .bind(data.is_active)
    .bind(data.sort_order)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tax {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tax {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM tax_config WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
