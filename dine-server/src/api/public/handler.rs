//! Public Table Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{DiningTable, parse_qr_payload};

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub payload: String,
}

/// 顾客可见的桌台信息
#[derive(Debug, Serialize)]
pub struct PublicTable {
    pub id: i64,
    pub number: String,
}

impl From<DiningTable> for PublicTable {
    fn from(table: DiningTable) -> Self {
        Self {
            id: table.id,
            number: table.number,
        }
    }
}

/// GET /api/tables/resolve?payload= - 二维码内容解析为桌台
pub async fn resolve(
    State(state): State<ServerState>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<Json<PublicTable>> {
    let table_id = parse_qr_payload(&query.payload, Some(&state.config.public_origin))
        .ok_or_else(|| {
            AppError::new(ErrorCode::QrPayloadInvalid).with_detail("payload", query.payload.clone())
        })?;

    let table = dining_table::find_by_id(&state.pool, table_id)
        .await?
        .ok_or_else(|| AppError::table_not_found(table_id))?;
    Ok(Json(table.into()))
}

/// GET /api/public/tables/{id} - 点餐页桌台信息
pub async fn get_table(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PublicTable>> {
    let table = dining_table::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::table_not_found(id))?;
    Ok(Json(table.into()))
}
