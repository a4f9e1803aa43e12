//! 认证中间件
//!
//! JWT + 服务端会话认证，以及基于权限字符串的授权。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Method};

use crate::AppError;
use crate::auth::session::ensure_session_active;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 顾客侧公共接口 (无需登录)
fn is_public_api_route(method: &Method, path: &str) -> bool {
    const PUBLIC_PREFIXES: &[&str] = &[
        "/api/menu/",
        "/api/public/",
        "/api/realtime/",
        "/api/auth/otp/",
    ];
    const PUBLIC_PATHS: &[&str] = &[
        "/api/tables/resolve",
        "/api/orders/mine",
        "/api/bill",
        "/api/auth/login",
    ];

    PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
        || (method == Method::POST && path == "/api/orders")
}

/// 校验请求头中的令牌和对应会话，返回当前员工
pub(crate) async fn authenticate(
    state: &ServerState,
    headers: &HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let auth_header = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );
            return match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    if let Err(e) = ensure_session_active(&state.pool, &claims).await {
        security_log!(
            "WARN",
            "session_rejected",
            session_id = claims.sid.clone(),
            subject = claims.sub.clone()
        );
        return Err(e);
    }

    Ok(CurrentUser::from(claims))
}

/// 认证中间件 - 要求员工登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT，再核对 `sid`
/// 指向的会话行未被撤销且未过期。成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (`/health` 等)
/// - 顾客侧接口：菜单、桌台解析、下单、我的订单、发票下载、实时推送
/// - 登录接口：`/api/auth/otp/*`、`/api/auth/login`
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 会话已撤销或过期 | 401 SessionExpired |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state, req.headers(), req.uri()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 权限检查中间件 - 要求特定权限
///
/// # 支持的通配符
///
/// - `"orders:*"` 匹配所有 orders 相关操作
/// - `"all"` 匹配所有权限
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/dishes", post(handler::create))
///     .layer(middleware::from_fn(require_permission("menu:manage")));
/// ```
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AppError::unauthorized())?;

            if !user.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    subject = user.subject.clone(),
                    role = user.role.clone(),
                    required_permission = permission
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}
