use super::AppState;
use super::error::ApiError;
use super::requester;
use crate::core::create::CreateLogic;
use crate::core::del::DeleteLogic;
use crate::core::read::{ListQuery, ReadLogic};
use crate::core::today::{TodayLogic, TodayStatus};
use crate::core::update::UpdateLogic;
use crate::db::pool::DbPool;
use crate::models::presence::PresenceView;
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::MutexGuard;

fn lock(state: &AppState) -> Result<MutexGuard<'_, DbPool>, ApiError> {
    state
        .pool
        .lock()
        .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "database lock poisoned"))
}

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e.body_text()))
}

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_presences(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<PresenceView>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::read)?;

    ReadLogic::list(&pool, &requester, &query)
        .map(Json)
        .map_err(ApiError::read)
}

pub async fn create_presence(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<PresenceView>), ApiError> {
    let mut pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::write)?;

    CreateLogic::apply(&mut pool, &requester, &body, state.opts)
        .map(|view| (StatusCode::CREATED, Json(view)))
        .map_err(ApiError::write)
}

pub async fn today(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TodayStatus>, ApiError> {
    let pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::read)?;

    TodayLogic::status(&pool, &requester, Utc::now())
        .map(Json)
        .map_err(ApiError::read)
}

pub async fn retrieve_presence(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PresenceView>, ApiError> {
    let id = path_id(id)?;
    let pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::read)?;

    ReadLogic::retrieve(&pool, &requester, id)
        .map(Json)
        .map_err(ApiError::read)
}

async fn update(
    state: AppState,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
    partial: bool,
) -> Result<Json<PresenceView>, ApiError> {
    let id = path_id(id)?;
    let mut pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::write)?;

    UpdateLogic::apply(&mut pool, &requester, id, &body, partial)
        .map(Json)
        .map_err(ApiError::write)
}

pub async fn put_presence(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<PresenceView>, ApiError> {
    update(state, headers, id, body, false).await
}

pub async fn patch_presence(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<PresenceView>, ApiError> {
    update(state, headers, id, body, true).await
}

pub async fn delete_presence(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    let mut pool = lock(&state)?;
    let requester = requester::resolve(&pool, &headers).map_err(ApiError::write)?;

    DeleteLogic::apply(&mut pool, &requester, id)
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(ApiError::write)
}
