//! Dish Repository

use super::{RepoError, RepoResult};
use shared::models::{Dish, DishCreate, DishQuery, DishUpdate};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const COLUMNS: &str =
    "id, name, description, price, image_url, is_spicy, tags, category_id, created_at";

/// List dishes, optionally filtered by category and/or tag
///
/// Tag matching is case-insensitive and done after loading; the menu is small.
pub async fn find_all(pool: &SqlitePool, query: &DishQuery) -> RepoResult<Vec<Dish>> {
    let rows = match query.category_id {
        Some(category_id) => {
            sqlx::query_as::<_, Dish>(&format!(
                "SELECT {COLUMNS} FROM dish WHERE category_id = ? ORDER BY name"
            ))
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Dish>(&format!("SELECT {COLUMNS} FROM dish ORDER BY name"))
                .fetch_all(pool)
                .await?
        }
    };

    Ok(match query.tag.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => rows.into_iter().filter(|d| d.has_tag(tag)).collect(),
        _ => rows,
    })
}

pub async fn find_by_id<'e>(exec: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Dish>> {
    let row = sqlx::query_as::<_, Dish>(&format!("SELECT {COLUMNS} FROM dish WHERE id = ?"))
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: DishCreate) -> RepoResult<Dish> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO dish (id, name, description, price, image_url, is_spicy, tags, category_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(data.is_spicy)
    .bind(Json(&data.tags))
    .bind(data.category_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dish".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DishUpdate) -> RepoResult<Dish> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))?;

    let tags = data.tags.unwrap_or(existing.tags);
    let category_id = match data.category_id {
        Some(value) => value,
        None => existing.category_id,
    };

    sqlx::query(
        "UPDATE dish SET name = COALESCE(?1, name), description = COALESCE(?2, description), price = COALESCE(?3, price), image_url = COALESCE(?4, image_url), is_spicy = COALESCE(?5, is_spicy), tags = ?6, category_id = ?7 WHERE id = ?8",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description)
    .bind(data.price)
    .bind(data.image_url)
    .bind(data.is_spicy)
    .bind(Json(&tags))
    .bind(category_id)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Dish {id} not found")))
}

/// Hard delete; existing orders keep their name/price snapshot
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dish WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
