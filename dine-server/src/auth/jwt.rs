//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。令牌只是会话的凭据：`sid` 指向
//! `staff_session` 行，认证中间件每次请求都会核对该行。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::permissions::ROLE_ADMIN;

/// JWT 密钥最小长度
const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
            Ok(_) => {
                tracing::error!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters, using a temporary key"
                );
                generate_secure_printable_jwt_secret()
            }
            Err(_) => {
                tracing::warn!(
                    "JWT_SECRET not set, generating a temporary key (sessions end on restart)"
                );
                generate_secure_printable_jwt_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 默认 12 小时 (一个营业班次)
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dine-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dine-staff".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 员工标识 (手机号，密码登录为 "admin")
    pub sub: String,
    /// 会话 ID (`staff_session.id`)
    pub sid: String,
    /// 角色名称
    pub role: String,
    /// 权限列表 (逗号分隔)
    pub permissions: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 生成可打印的安全 JWT 密钥 (64 字符)
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_.~";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // 系统随机源不可用时退化为 uuid v4 (同样来自 OS 随机源)
        return format!("{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple());
    }

    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}

/// 签发结果
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// 过期时间 (毫秒)
    pub expires_at: i64,
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为会话签发令牌
    pub fn generate_token(
        &self,
        session_id: &str,
        subject: &str,
        role: &str,
        permissions: &[String],
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: subject.to_string(),
            sid: session_id.to_string(),
            role: role.to_string(),
            permissions: permissions.join(","),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_at: expiration.timestamp_millis(),
        })
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前员工上下文 (由认证中间件注入请求扩展)
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> Json<()> {
///     if user.has_permission("bills:approve") {
///         // ...
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 会话 ID
    pub session_id: String,
    /// 员工标识 (手机号或 "admin")
    pub subject: String,
    /// 角色名称
    pub role: String,
    /// 权限列表
    pub permissions: Vec<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let permissions = if claims.permissions.is_empty() {
            vec![]
        } else {
            claims
                .permissions
                .split(',')
                .map(|s| s.to_string())
                .collect()
        };

        Self {
            session_id: claims.sid,
            subject: claims.sub,
            role: claims.role,
            permissions,
        }
    }
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// 检查是否拥有指定权限
    ///
    /// 1. 管理员拥有所有权限
    /// 2. 权限列表包含 `"all"` 则拥有所有权限
    /// 3. 精确匹配或前缀匹配 (`"orders:*"` 匹配 `"orders:write"`)
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.is_admin() {
            return true;
        }

        self.permissions.iter().any(|p| {
            if p == "all" || p == permission {
                return true;
            }
            match p.strip_suffix(":*") {
                Some(prefix) => permission
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with(':')),
                None => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-key-that-is-long-enough-123".into(),
            expiration_minutes: 60,
            issuer: "dine-server".into(),
            audience: "dine-staff".into(),
        })
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let permissions = vec!["orders:*".to_string(), "bills:*".to_string()];

        let issued = service
            .generate_token("sess-1", "9845012345", "receptionist", &permissions)
            .unwrap();
        let claims = service.validate_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "9845012345");
        assert_eq!(claims.sid, "sess-1");
        assert_eq!(claims.role, "receptionist");
        assert!(issued.expires_at > Utc::now().timestamp_millis());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issued = service()
            .generate_token("sess-1", "admin", "admin", &["all".to_string()])
            .unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-that-is-long-enough".into(),
            ..service().config
        });
        assert!(matches!(
            other.validate_token(&issued.token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_permission_matching() {
        let user = CurrentUser {
            session_id: "s".into(),
            subject: "9845012345".into(),
            role: "receptionist".into(),
            permissions: vec!["orders:*".into(), "menu:read".into()],
        };

        assert!(user.has_permission("orders:write"));
        assert!(user.has_permission("menu:read"));
        assert!(!user.has_permission("menu:manage"));
        assert!(!user.has_permission("ordersx:read"));
        assert!(!user.is_admin());

        let admin = CurrentUser {
            role: ROLE_ADMIN.into(),
            permissions: vec![],
            ..user
        };
        assert!(admin.has_permission("settings:manage"));
    }

    #[test]
    fn test_printable_secret() {
        let secret = generate_secure_printable_jwt_secret();
        assert!(secret.len() >= MIN_SECRET_LEN);
        assert!(secret.chars().all(|c| c.is_ascii_graphic()));
    }
}
