//! Realtime API 模块
//!
//! `GET /api/realtime/orders?phone=` 升级为 WebSocket，推送该手机号的订单状态。

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::realtime::ws::handle_orders_ws;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/realtime/orders", get(handle_orders_ws))
}
