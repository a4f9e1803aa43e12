//! Menu Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use shared::models::{Category, Dish, DishQuery, Event};

use crate::core::ServerState;
use crate::db::repository::{category, dish, event};
use crate::utils::AppResult;

/// GET /api/menu/dishes?category_id=&tag= - 菜品列表
pub async fn dishes(
    State(state): State<ServerState>,
    Query(query): Query<DishQuery>,
) -> AppResult<Json<Vec<Dish>>> {
    let dishes = dish::find_all(&state.pool, &query).await?;
    Ok(Json(dishes))
}

/// GET /api/menu/categories - 分类列表
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/menu/events - 今天及以后的有效活动
pub async fn events(State(state): State<ServerState>) -> AppResult<Json<Vec<Event>>> {
    let today = Utc::now()
        .with_timezone(&state.config.branding.timezone)
        .date_naive();
    let events = event::find_upcoming(&state.pool, today).await?;
    Ok(Json(events))
}
