//! Requester identification. Authentication proper is handled upstream;
//! this layer only maps the `X-User-Id` header onto a stored user.

use crate::db::pool::DbPool;
use crate::db::users::find_user;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use axum::http::HeaderMap;

pub const USER_HEADER: &str = "x-user-id";

pub fn resolve(pool: &DbPool, headers: &HeaderMap) -> AppResult<User> {
    let raw = headers
        .get(USER_HEADER)
        .ok_or_else(|| AppError::Unauthenticated("missing X-User-Id header".into()))?
        .to_str()
        .map_err(|_| AppError::Unauthenticated("X-User-Id is not valid text".into()))?;

    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Unauthenticated(format!("X-User-Id '{}' is not an id", raw)))?;

    find_user(&pool.conn, id)?
        .ok_or_else(|| AppError::Unauthenticated(format!("unknown user {}", id)))
}
