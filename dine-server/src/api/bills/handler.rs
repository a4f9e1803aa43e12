//! Table Bill Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{ApproveBillRequest, BillPreview, TableBill};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;

/// GET /api/bills/tables/{table_id}/preview - 预览整桌账单 (不落库)
pub async fn preview(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<BillPreview>> {
    let preview = state.billing.preview_table_bill(table_id).await?;
    Ok(Json(preview))
}

/// POST /api/bills/tables/{table_id}/approve - 审批整桌账单
///
/// 请求体可选；`order_ids` 为空时审批该桌全部待审批订单。
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(table_id): Path<i64>,
    payload: Option<Json<ApproveBillRequest>>,
) -> AppResult<Json<TableBill>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let bill = state
        .billing
        .approve_table_bill(table_id, request.order_ids.as_deref(), &user.subject)
        .await?;
    Ok(Json(bill))
}

/// GET /api/bills/tables/{table_id} - 某桌历史账单
pub async fn list_for_table(
    State(state): State<ServerState>,
    Path(table_id): Path<i64>,
) -> AppResult<Json<Vec<TableBill>>> {
    let bills = state.billing.list_table_bills(table_id).await?;
    Ok(Json(bills))
}

/// GET /api/bills/{id} - 账单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TableBill>> {
    let bill = state.billing.get_bill(id).await?;
    Ok(Json(bill))
}
