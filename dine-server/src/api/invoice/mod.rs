//! Invoice API 模块
//!
//! `GET /api/bill?orderId=&variant=` 返回 PDF 附件。顾客凭订单号即可下载。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/bill", get(handler::download))
}
