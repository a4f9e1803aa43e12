//! Event Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{Event, EventCreate, EventUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, description, event_date, is_active, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM event ORDER BY event_date"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Active events on or after `today`, soonest first
pub async fn find_upcoming(pool: &SqlitePool, today: NaiveDate) -> RepoResult<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(&format!(
        "SELECT {COLUMNS} FROM event WHERE is_active = 1 AND event_date >= ? ORDER BY event_date"
    ))
    .bind(today)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Event>> {
    let row = sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM event WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: EventCreate) -> RepoResult<Event> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO event (id, title, description, event_date, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(data.event_date)
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create event".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: EventUpdate) -> RepoResult<Event> {
    let rows = sqlx::query(
        "UPDATE event SET title = COALESCE(?1, title), description = COALESCE(?2, description), event_date = COALESCE(?3, event_date), is_active = COALESCE(?4, is_active) WHERE id = ?5",
    )
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.description)
    .bind(data.event_date)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Event {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Event {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM event WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
