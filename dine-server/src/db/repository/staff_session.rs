//! Staff Session Repository
//!
//! Server-side session rows backing issued access tokens.

use super::RepoResult;
use sqlx::SqlitePool;

/// Session row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffSession {
    pub id: String,
    pub phone: String,
    pub role: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub revoked: bool,
}

impl StaffSession {
    pub fn is_active(&self, now_millis: i64) -> bool {
        !self.revoked && self.expires_at > now_millis
    }
}

pub async fn create(
    pool: &SqlitePool,
    id: &str,
    phone: &str,
    role: &str,
    expires_at: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO staff_session (id, phone, role, created_at, expires_at, revoked) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
    )
    .bind(id)
    .bind(phone)
    .bind(role)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<StaffSession>> {
    let row = sqlx::query_as::<_, StaffSession>(
        "SELECT id, phone, role, created_at, expires_at, revoked FROM staff_session WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Revoke one session. Returns whether a live session was revoked.
pub async fn revoke(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE staff_session SET revoked = 1 WHERE id = ? AND revoked = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Revoke every session of a phone (role change, access removed)
pub async fn revoke_by_phone(pool: &SqlitePool, phone: &str) -> RepoResult<u64> {
    let rows =
        sqlx::query("UPDATE staff_session SET revoked = 1 WHERE phone = ? AND revoked = 0")
            .bind(phone)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected())
}

/// Remove expired or revoked rows
pub async fn purge_inactive(pool: &SqlitePool, now_millis: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM staff_session WHERE revoked = 1 OR expires_at <= ?")
        .bind(now_millis)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
