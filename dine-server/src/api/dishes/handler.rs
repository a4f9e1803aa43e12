//! Dish API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use shared::models::{Dish, DishCreate, DishQuery, DishUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{category, dish};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PRICE, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_amount,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const MAX_TAGS: usize = 10;

fn dish_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::DishNotFound, format!("Dish {id} not found"))
        .with_detail("dish_id", id)
}

fn validate_tags(tags: &[String]) -> AppResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(AppError::validation(format!(
            "tags has too many entries ({}, max {MAX_TAGS})",
            tags.len()
        )));
    }
    for tag in tags {
        validate_required_text(tag, "tag", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

/// 可为空的文本字段，仅限长度
fn validate_text_len(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> AppResult<()> {
    validate_amount(price, "price", MAX_PRICE).map_err(|e| {
        AppError::with_message(ErrorCode::DishInvalidPrice, e.message).with_detail("price", price)
    })
}

async fn ensure_category(state: &ServerState, category_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = category_id
        && category::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(
            AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
                .with_detail("category_id", id),
        );
    }
    Ok(())
}

/// GET /api/dishes?category_id=&tag= - 获取菜品
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<DishQuery>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish::find_all(&state.pool, &query).await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Dish>> {
    let dish = dish::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| dish_not_found(id))?;
    Ok(Json(dish))
}

/// POST /api/dishes - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_text_len(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_text_len(&payload.image_url, "image_url", MAX_URL_LEN)?;
    validate_price(payload.price)?;
    validate_tags(&payload.tags)?;
    ensure_category(&state, payload.category_id).await?;

    let dish = dish::create(&state.pool, payload).await?;
    tracing::info!(dish_id = dish.id, name = %dish.name, by = %current_user.subject, "Dish created");
    Ok(Json(dish))
}

/// PUT /api/dishes/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(tags) = &payload.tags {
        validate_tags(tags)?;
    }
    if let Some(category_id) = payload.category_id {
        ensure_category(&state, category_id).await?;
    }

    if dish::find_by_id(&state.pool, id).await?.is_none() {
        return Err(dish_not_found(id));
    }
    let dish = dish::update(&state.pool, id, payload).await?;
    tracing::info!(dish_id = id, by = %current_user.subject, "Dish updated");
    Ok(Json(dish))
}

/// DELETE /api/dishes/{id} - 删除菜品
///
/// 已下单的订单保存的是菜品快照，不受影响。
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = dish::delete(&state.pool, id).await?;
    if !deleted {
        return Err(dish_not_found(id));
    }
    tracing::info!(dish_id = id, by = %current_user.subject, "Dish deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&["Best Seller".into(), "Chef Special".into()]).is_ok());
        assert!(validate_tags(&["".into()]).is_err());

        let many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&many).is_err());
    }

    #[test]
    fn test_validate_price_uses_dish_code() {
        assert!(validate_price(250.0).is_ok());
        assert_eq!(validate_price(-1.0).unwrap_err().code, ErrorCode::DishInvalidPrice);
        assert_eq!(validate_price(f64::NAN).unwrap_err().code, ErrorCode::DishInvalidPrice);
    }
}
