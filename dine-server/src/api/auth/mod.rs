//! Authentication Routes
//!
//! - /api/auth/otp/request, /api/auth/otp/verify, /api/auth/login: 公共
//! - /api/auth/me, /api/auth/logout: 需要登录 (由全局 require_auth 处理)

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/otp/request", post(handler::request_otp))
        .route("/api/auth/otp/verify", post(handler::verify_otp))
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/logout", post(handler::logout))
}
