//! `/api/users` handlers. Directory management is admin only; any caller
//! may read their own profile and edit its name and email.

use super::extract::{ApiJson, ApiPath};
use crate::domain::error::ApiError;
use crate::domain::views::Removed;
use crate::middleware::auth::{AdminOnly, AnyRole, Authorized};
use crate::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use fleet_types::{EntityId, User};
use fm_04_access_policy::{NewUser, ProfilePatch, UserPatch};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/profile", get(profile).put(update_profile))
        .route("/:id", get(fetch).put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users()?))
}

async fn create(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create_user(input)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn profile(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_user(auth.caller.user_id)?))
}

async fn update_profile(
    State(state): State<AppState>,
    auth: Authorized<AnyRole>,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .update_user(auth.caller.user_id, UserPatch::from(patch))?;
    Ok(Json(user))
}

async fn fetch(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_user(id)?))
}

async fn update(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update_user(id, patch)?))
}

async fn remove(
    State(state): State<AppState>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Removed>, ApiError> {
    let user = state.users.delete_user(id)?;
    Ok(Json(Removed::new("User", user.id)))
}
