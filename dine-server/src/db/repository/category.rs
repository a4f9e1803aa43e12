//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, description, is_veg, cuisine_type, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let name = data.name.trim().to_string();
    if find_by_name(pool, &name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{name}' already exists"
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO category (id, name, description, is_veg, cuisine_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(&name)
    .bind(&data.description)
    .bind(data.is_veg)
    .bind(&data.cuisine_type)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    if let Some(ref new_name) = data.name
        && let Some(found) = find_by_name(pool, new_name.trim()).await?
        && found.id != id
    {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            new_name.trim()
        )));
    }

    let rows = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), description = COALESCE(?2, description), is_veg = COALESCE(?3, is_veg), cuisine_type = COALESCE(?4, cuisine_type) WHERE id = ?5",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description)
    .bind(data.is_veg)
    .bind(data.cuisine_type)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Delete a category; dishes keep existing with `category_id = NULL`
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
