//! System Config Repository (key/value rows)

use super::RepoResult;
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<(String, String)>> {
    let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM system_config")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Upsert all pairs in one transaction
pub async fn upsert_many(pool: &SqlitePool, pairs: &[(&str, String)]) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    for (key, value) in pairs {
        sqlx::query(
            "INSERT INTO system_config (key, value, updated_at) VALUES (?1, ?2, ?3) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(*key)
        .bind(value)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
