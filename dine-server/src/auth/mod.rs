//! 认证授权模块
//!
//! 提供 JWT、服务端会话、验证码和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前员工上下文
//! - [`require_auth`] - 认证中间件 (JWT + 会话行)
//! - [`require_permission`] - 权限检查中间件
//! - [`OtpStore`] - 一次性验证码

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod otp;
pub mod password;
pub mod permissions;
pub mod session;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};
pub use otp::OtpStore;
pub use session::{SessionInfo, open_session, revoke_session};
