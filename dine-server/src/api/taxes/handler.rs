//! Tax Config Handlers
//!
//! 税率修改只影响之后的预览和审批；已审批账单保存的是当时的明细。

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{TaxConfig, TaxConfigCreate, TaxConfigUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, tax_config};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

fn tax_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TaxNotFound, format!("Tax {id} not found"))
        .with_detail("tax_id", id)
}

/// 百分比须在 [0, 100] 内
fn validate_percentage(percentage: f64) -> AppResult<()> {
    if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
        return Err(AppError::with_message(
            ErrorCode::TaxInvalidPercentage,
            format!("Tax percentage must be between 0 and 100, got {percentage}"),
        )
        .with_detail("percentage", percentage));
    }
    Ok(())
}

/// GET /api/taxes - 获取全部税项 (含停用)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<TaxConfig>>> {
    let taxes = tax_config::find_all(&state.pool).await?;
    Ok(Json(taxes))
}

/// GET /api/taxes/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TaxConfig>> {
    let tax = tax_config::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| tax_not_found(id))?;
    Ok(Json(tax))
}

/// POST /api/taxes - 新增税项
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<TaxConfigCreate>,
) -> AppResult<Json<TaxConfig>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_percentage(payload.percentage)?;

    let tax = tax_config::create(&state.pool, payload).await?;
    tracing::info!(tax_id = tax.id, name = %tax.name, percentage = tax.percentage, by = %current_user.subject, "Tax created");
    Ok(Json(tax))
}

/// PUT /api/taxes/{id} - 更新税项
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<TaxConfigUpdate>,
) -> AppResult<Json<TaxConfig>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(percentage) = payload.percentage {
        validate_percentage(percentage)?;
    }

    let tax = tax_config::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => tax_not_found(id),
            other => other.into(),
        })?;
    tracing::info!(tax_id = id, active = tax.is_active, by = %current_user.subject, "Tax updated");
    Ok(Json(tax))
}

/// DELETE /api/taxes/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !tax_config::delete(&state.pool, id).await? {
        return Err(tax_not_found(id));
    }
    tracing::info!(tax_id = id, by = %current_user.subject, "Tax deleted");
    Ok(Json(true))
}
