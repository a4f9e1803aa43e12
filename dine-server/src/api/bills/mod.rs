//! Table Bill API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bills", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/tables/{table_id}/preview", get(handler::preview))
        .route("/tables/{table_id}", get(handler::list_for_table))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("bills:read")));

    let approve_routes = Router::new()
        .route("/tables/{table_id}/approve", post(handler::approve))
        .layer(middleware::from_fn(require_permission("bills:approve")));

    read_routes.merge(approve_routes)
}
