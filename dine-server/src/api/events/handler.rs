//! Event API Handlers

use axum::{
    Json,
    extract::{Extension, Path, State},
};
use shared::models::{Event, EventCreate, EventUpdate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, event};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

fn event_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::EventNotFound, format!("Event {id} not found"))
        .with_detail("event_id", id)
}

/// GET /api/events - 获取全部活动 (含过期、停用)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Event>>> {
    let events = event::find_all(&state.pool).await?;
    Ok(Json(events))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Event>> {
    let event = event::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    Ok(Json(event))
}

/// POST /api/events - 创建活动
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<EventCreate>,
) -> AppResult<Json<Event>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    if payload.description.len() > MAX_NOTE_LEN {
        return Err(AppError::validation(format!(
            "description is too long (max {MAX_NOTE_LEN})"
        )));
    }

    let event = event::create(&state.pool, payload).await?;
    tracing::info!(event_id = event.id, date = %event.event_date, by = %current_user.subject, "Event created");
    Ok(Json(event))
}

/// PUT /api/events/{id} - 更新活动
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<EventUpdate>,
) -> AppResult<Json<Event>> {
    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let event = event::update(&state.pool, id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => event_not_found(id),
            other => other.into(),
        })?;
    tracing::info!(event_id = id, by = %current_user.subject, "Event updated");
    Ok(Json(event))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if !event::delete(&state.pool, id).await? {
        return Err(event_not_found(id));
    }
    tracing::info!(event_id = id, by = %current_user.subject, "Event deleted");
    Ok(Json(true))
}
