//! Order API 模块
//!
//! - `POST /api/orders`、`GET /api/orders/mine`: 顾客 (公共)
//! - 其余: 员工，按 `orders:read` / `orders:write` 授权

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/", post(handler::place))
        .route("/mine", get(handler::mine));

    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("orders:read")));

    let write_routes = Router::new()
        .route("/{id}/items/{index}", delete(handler::remove_item))
        .route("/{id}/complete", post(handler::complete))
        .layer(middleware::from_fn(require_permission("orders:write")));

    customer_routes.merge(read_routes).merge(write_routes)
}
