//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderCreate, OrderQuery};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::validate_phone;

#[derive(Debug, Deserialize)]
pub struct MineQuery {
    pub phone: String,
}

/// POST /api/orders - 顾客下单
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.place_order(payload).await?;
    Ok(Json(order))
}

/// GET /api/orders/mine?phone= - 顾客自己的订单
pub async fn mine(
    State(state): State<ServerState>,
    Query(query): Query<MineQuery>,
) -> AppResult<Json<Vec<Order>>> {
    validate_phone(&query.phone, "phone")?;
    let orders = state.orders.list_by_phone(&query.phone).await?;
    Ok(Json(orders))
}

/// GET /api/orders?status=&table_id= - 订单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list(&query).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get(id).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/{id}/items/{index} - 删除待审批订单的菜品行
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, index)): Path<(i64, usize)>,
) -> AppResult<Json<Order>> {
    let order = state.billing.remove_line_item(id, index).await?;
    tracing::info!(order_id = id, index, by = %user.subject, "Order item removed by staff");
    Ok(Json(order))
}

/// POST /api/orders/{id}/complete - 完成订单
pub async fn complete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.billing.complete_order(id).await?;
    tracing::info!(order_id = id, by = %user.subject, "Order marked completed");
    Ok(Json(order))
}
