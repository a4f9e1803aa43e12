//! Category API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, category};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn category_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        .with_detail("category_id", id)
}

/// 名称重复映射为 `CategoryNameExists`
fn map_repo_error(err: RepoError) -> AppError {
    match err {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::CategoryNameExists, msg),
        other => other.into(),
    }
}

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| category_not_found(id))?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }
    if payload.cuisine_type.len() > MAX_SHORT_TEXT_LEN {
        return Err(AppError::validation(format!(
            "cuisine_type is too long (max {MAX_SHORT_TEXT_LEN})"
        )));
    }

    let category = category::create(&state.pool, payload)
        .await
        .map_err(map_repo_error)?;
    tracing::info!(category_id = category.id, name = %category.name, by = %current_user.subject, "Category created");
    Ok(Json(category))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.cuisine_type, "cuisine_type", MAX_SHORT_TEXT_LEN)?;

    let category = category::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => category_not_found(id),
            other => map_repo_error(other),
        })?;
    tracing::info!(category_id = id, by = %current_user.subject, "Category updated");
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - 删除分类 (菜品保留，分类置空)
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !category::delete(&state.pool, id).await? {
        return Err(category_not_found(id));
    }
    tracing::info!(category_id = id, by = %current_user.subject, "Category deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_maps_to_name_exists() {
        let err = map_repo_error(RepoError::Duplicate("Category 'Starters' already exists".into()));
        assert_eq!(err.code, ErrorCode::CategoryNameExists);

        let err = map_repo_error(RepoError::Database("boom".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
