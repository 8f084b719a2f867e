use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{UserRequest, UserResponse},
    services,
};
use crate::{
    error::ServiceError,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/:username", put(rename_user).delete(delete_user))
        .route("/users/:username/", put(rename_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ServiceError> {
    let users = services::list_users(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ServiceError> {
    let user = services::create_user(&state.db, &payload.username).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn rename_user(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(payload): AppJson<UserRequest>,
) -> Result<Json<UserResponse>, ServiceError> {
    let user = services::rename_user(&state.db, &username, &payload.username).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
) -> Result<Json<UserResponse>, ServiceError> {
    let user = services::delete_user(&state.db, &username).await?;
    Ok(Json(user.into()))
}
