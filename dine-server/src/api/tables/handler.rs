//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use serde::Serialize;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, dining_table};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// 桌号重复 / 桌台仍有订单，映射为桌台专用错误码
fn map_repo_error(err: RepoError, id: Option<i64>) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TableNumberExists, msg),
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::TableHasOrders, msg),
        RepoError::NotFound(msg) => match id {
            Some(id) => AppError::table_not_found(id),
            None => AppError::with_message(ErrorCode::NotFound, msg),
        },
        other => other.into(),
    }
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(&state.pool).await?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - 获取单个桌台 (含二维码内容)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = dining_table::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::table_not_found(id))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台，二维码内容按 `PUBLIC_ORIGIN` 生成
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;

    let table = dining_table::create(&state.pool, &payload.number, &state.config.public_origin)
        .await
        .map_err(|e| map_repo_error(e, None))?;
    tracing::info!(table_id = table.id, number = %table.number, by = %current_user.subject, "Dining table created");
    Ok(Json(table))
}

/// PUT /api/tables/{id} - 修改桌号
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let Some(number) = payload.number else {
        return get_by_id(State(state), Path(id)).await;
    };
    validate_required_text(&number, "number", MAX_SHORT_TEXT_LEN)?;

    let table = dining_table::update_number(&state.pool, id, &number)
        .await
        .map_err(|e| map_repo_error(e, Some(id)))?;
    tracing::info!(table_id = id, number = %table.number, by = %current_user.subject, "Dining table renamed");
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - 删除桌台 (有订单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = dining_table::delete(&state.pool, id)
        .await
        .map_err(|e| map_repo_error(e, Some(id)))?;
    if !deleted {
        return Err(AppError::table_not_found(id));
    }
    tracing::info!(table_id = id, by = %current_user.subject, "Dining table deleted");
    Ok(Json(true))
}

#[derive(Debug, Serialize)]
pub struct QrRefreshResponse {
    pub origin: String,
    pub updated: u64,
}

/// POST /api/tables/qr/refresh - 按当前 origin 重新生成二维码内容
pub async fn refresh_qr(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<QrRefreshResponse>> {
    let origin = state.config.public_origin.clone();
    let updated = dining_table::refresh_qr_payloads(&state.pool, &origin).await?;
    tracing::info!(updated, origin = %origin, by = %current_user.subject, "QR payloads refreshed");
    Ok(Json(QrRefreshResponse { origin, updated }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err = map_repo_error(RepoError::Validation("Table 3 has 2 orders".into()), Some(3));
        assert_eq!(err.code, ErrorCode::TableHasOrders);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        let err = map_repo_error(RepoError::Duplicate("Table 'T5' already exists".into()), None);
        assert_eq!(err.code, ErrorCode::TableNumberExists);

        let err = map_repo_error(RepoError::NotFound("gone".into()), Some(9));
        assert_eq!(err.code, ErrorCode::TableNotFound);
    }
}
