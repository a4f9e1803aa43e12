//! 桌台公共 API
//!
//! 顾客扫码后解析二维码内容并获取桌台信息。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/tables/resolve", get(handler::resolve))
        .route("/api/public/tables/{id}", get(handler::get_table))
}
