//! 服务端会话
//!
//! 每次登录写入一行 `staff_session`，签发的 JWT 通过 `sid` 引用该行。
//! 注销或撤销后，即使令牌未过期也无法继续使用。

use serde::Serialize;
use sqlx::SqlitePool;

use super::jwt::{Claims, JwtService};
use super::permissions::get_default_permissions;
use crate::db::repository::staff_session;
use crate::utils::{AppError, AppResult};

/// 登录成功后返回给客户端的会话信息
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub token: String,
    pub session_id: String,
    pub subject: String,
    pub role: String,
    pub permissions: Vec<String>,
    /// 过期时间 (毫秒)
    pub expires_at: i64,
}

/// 打开新会话：写会话行并签发令牌
pub async fn open_session(
    pool: &SqlitePool,
    jwt: &JwtService,
    subject: &str,
    role: &str,
) -> AppResult<SessionInfo> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let permissions = get_default_permissions(role);

    let issued = jwt
        .generate_token(&session_id, subject, role, &permissions)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    staff_session::create(pool, &session_id, subject, role, issued.expires_at).await?;

    tracing::info!(subject = %subject, role = %role, session_id = %session_id, "Staff session opened");

    Ok(SessionInfo {
        token: issued.token,
        session_id,
        subject: subject.to_string(),
        role: role.to_string(),
        permissions,
        expires_at: issued.expires_at,
    })
}

/// 核对令牌对应的会话行仍然有效
pub async fn ensure_session_active(pool: &SqlitePool, claims: &Claims) -> AppResult<()> {
    let session = staff_session::find_by_id(pool, &claims.sid)
        .await?
        .ok_or_else(AppError::session_expired)?;

    if !session.is_active(shared::util::now_millis()) || session.phone != claims.sub {
        return Err(AppError::session_expired());
    }
    Ok(())
}

/// 撤销会话，返回是否撤销了一个有效会话
pub async fn revoke_session(pool: &SqlitePool, session_id: &str) -> AppResult<bool> {
    Ok(staff_session::revoke(pool, session_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;
    use crate::db::DbService;
    use crate::utils::ErrorCode;

    fn jwt() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "session-test-secret-key-long-enough-000".into(),
            expiration_minutes: 30,
            issuer: "dine-server".into(),
            audience: "dine-staff".into(),
        })
    }

    #[tokio::test]
    async fn test_open_validate_and_revoke() {
        let db = DbService::in_memory().await.unwrap();
        let jwt = jwt();

        let info = open_session(&db.pool, &jwt, "9845012345", "receptionist")
            .await
            .unwrap();
        assert!(info.permissions.contains(&"orders:*".to_string()));

        let claims = jwt.validate_token(&info.token).unwrap();
        assert_eq!(claims.sid, info.session_id);
        ensure_session_active(&db.pool, &claims).await.unwrap();

        assert!(revoke_session(&db.pool, &info.session_id).await.unwrap());
        let err = ensure_session_active(&db.pool, &claims).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);

        // 二次撤销无效果
        assert!(!revoke_session(&db.pool, &info.session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let jwt = jwt();
        let issued = jwt
            .generate_token("no-such-session", "admin", "admin", &["all".to_string()])
            .unwrap();
        let claims = jwt.validate_token(&issued.token).unwrap();

        let err = ensure_session_active(&db.pool, &claims).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);
    }
}
