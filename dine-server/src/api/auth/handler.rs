//! Authentication Handlers
//!
//! 前台与管理员手机号走 OTP，管理员另有密码登录。成功后写入服务端会话
//! 并返回引用该会话的令牌。

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::normalize_phone;
use validator::Validate;

use crate::auth::password::verify_password;
use crate::auth::permissions::{ROLE_ADMIN, ROLE_RECEPTIONIST};
use crate::auth::{CurrentUser, SessionInfo, open_session, revoke_session};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{from_validation_errors, validate_phone};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Fixed delay for password authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// 密码登录的会话主体
const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Deserialize, Validate)]
pub struct OtpRequest {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct OtpRequestResponse {
    pub sent: bool,
    pub expires_in_secs: u64,
    /// 仅开发环境返回，便于本地联调
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct OtpVerifyRequest {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub subject: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub session_id: String,
}

/// POST /api/auth/otp/request - 下发验证码
pub async fn request_otp(
    State(state): State<ServerState>,
    Json(req): Json<OtpRequest>,
) -> AppResult<Json<OtpRequestResponse>> {
    req.validate().map_err(from_validation_errors)?;
    validate_phone(&req.phone, "phone")?;
    let phone = normalize_phone(&req.phone);

    let settings = state.settings.get().await?;
    if !settings.is_receptionist_phone(&phone) && !settings.is_admin_phone(&phone) {
        security_log!("WARN", "otp_phone_rejected", phone = phone.clone());
        return Err(AppError::new(ErrorCode::PhoneNotAllowed));
    }

    let code = state.otp.issue(&phone)?;

    // 未接入短信通道：验证码写入专用日志目标，由运维转发
    tracing::info!(target: "otp_delivery", phone = %phone, code = %code, "Verification code issued");
    security_log!("INFO", "otp_issued", phone = phone.clone());

    Ok(Json(OtpRequestResponse {
        sent: true,
        expires_in_secs: state.config.otp_ttl_secs,
        dev_code: state.config.is_development().then_some(code),
    }))
}

/// POST /api/auth/otp/verify - 验证码换取会话
pub async fn verify_otp(
    State(state): State<ServerState>,
    Json(req): Json<OtpVerifyRequest>,
) -> AppResult<Json<SessionInfo>> {
    req.validate().map_err(from_validation_errors)?;
    let phone = normalize_phone(&req.phone);

    if let Err(e) = state.otp.verify(&phone, &req.code) {
        security_log!(
            "WARN",
            "otp_verify_failed",
            phone = phone.clone(),
            reason = e.message.clone()
        );
        return Err(e);
    }

    // 角色以验证时的设置为准
    let settings = state.settings.get().await?;
    let role = if settings.is_admin_phone(&phone) {
        ROLE_ADMIN
    } else if settings.is_receptionist_phone(&phone) {
        ROLE_RECEPTIONIST
    } else {
        security_log!("WARN", "otp_phone_removed", phone = phone.clone());
        return Err(AppError::new(ErrorCode::PhoneNotAllowed));
    };

    let session = open_session(&state.pool, state.get_jwt_service(), &phone, role).await?;
    security_log!("INFO", "login_success", subject = phone.clone(), role = role, method = "otp");
    Ok(Json(session))
}

/// POST /api/auth/login - 管理员密码登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<SessionInfo>> {
    req.validate().map_err(from_validation_errors)?;

    let valid = match state.config.admin_password_hash.as_deref() {
        Some(hash) => verify_password(&req.password, hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?,
        None => {
            tracing::warn!("Password login attempted but ADMIN_PASSWORD_HASH is not set");
            false
        }
    };

    // Fixed delay to prevent timing attacks (before reporting the result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if !valid {
        security_log!("WARN", "login_failed", subject = ADMIN_SUBJECT, method = "password");
        return Err(AppError::invalid_credentials());
    }

    let session =
        open_session(&state.pool, state.get_jwt_service(), ADMIN_SUBJECT, ROLE_ADMIN).await?;
    security_log!(
        "INFO",
        "login_success",
        subject = ADMIN_SUBJECT,
        role = ROLE_ADMIN,
        method = "password"
    );
    Ok(Json(session))
}

/// GET /api/auth/me - 当前员工
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        subject: user.subject,
        role: user.role,
        permissions: user.permissions,
        session_id: user.session_id,
    })
}

/// POST /api/auth/logout - 撤销当前会话
pub async fn logout(State(state): State<ServerState>, user: CurrentUser) -> AppResult<Json<bool>> {
    let revoked = revoke_session(&state.pool, &user.session_id).await?;
    security_log!(
        "INFO",
        "logout",
        subject = user.subject.clone(),
        session_id = user.session_id.clone()
    );
    Ok(Json(revoked))
}
