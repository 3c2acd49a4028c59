use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::users::dto::UserPayload;
use crate::users::entity::{PublicUser, User};
use crate::users::repo::{UserRepository, UserStore};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(get_all_users).post(create_user))
        .route(
            "/user/:id",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<ApiResponse<PublicUser>> {
    let user = User::try_new(payload)?;
    let created = UserRepository::new(state.db.clone()).create(user).await?;
    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "User created successfully",
        PublicUser::from(created),
    ))
}

#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<PublicUser>>> {
    let users = UserRepository::new(state.db.clone()).get_all().await?;
    let users: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();
    Ok(ApiResponse::success(
        StatusCode::OK,
        "Users fetched successfully",
        users,
    ))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<PublicUser>> {
    let id = UserRepository::parse_id(&id)?;
    let user = UserRepository::new(state.db.clone()).get_by_id(&id).await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "User fetched successfully",
        PublicUser::from(user),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> ApiResult<ApiResponse<PublicUser>> {
    let id = UserRepository::parse_id(&id)?;
    let user = User::try_new(payload)?;
    let updated = UserRepository::new(state.db.clone())
        .update_by_id(&id, user)
        .await?;
    Ok(ApiResponse::success(
        StatusCode::OK,
        "User updated successfully",
        PublicUser::from(updated),
    ))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = UserRepository::parse_id(&id)?;
    UserRepository::new(state.db.clone())
        .delete_by_id(&id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
