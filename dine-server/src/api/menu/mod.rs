//! 顾客菜单 API (公共)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dishes", get(handler::dishes))
        .route("/categories", get(handler::categories))
        .route("/events", get(handler::events))
}
