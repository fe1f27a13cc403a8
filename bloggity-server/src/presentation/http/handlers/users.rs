use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PaginationQuery;
use crate::application::user_service::ListUsersResult;
use crate::domain::user::{RegisterRequest, UpdateUserRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::middleware::auth::WriterActor;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) username: String,
    #[validate(length(min = 1, max = 30))]
    pub(crate) first_name: String,
    #[validate(length(min = 1, max = 30))]
    pub(crate) last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

/// Full profile replacement. Leaving `password` out keeps the current one.
/// Field rules run in the service, after the caller is matched to the user.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateUserDto {
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) first_name: String,
    #[serde(default)]
    pub(crate) last_name: String,
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListUsersResponseDto {
    pub(crate) users: Vec<UserDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

impl From<ListUsersResult> for ListUsersResponseDto {
    fn from(result: ListUsersResult) -> Self {
        Self {
            users: result.users.into_iter().map(UserDto::from).collect(),
            limit: result.pagination.limit,
            offset: result.pagination.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Users listed", body = ListUsersResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> AppResult<Json<ListUsersResponseDto>> {
    query.validate()?;
    let result = state.user_service.list_users(query.pagination()).await?;
    Ok(Json(ListUsersResponseDto::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Validation error or username taken"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    AppJson(dto): AppJson<RegisterDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;

    let req = RegisterRequest {
        username: dto.username,
        first_name: dto.first_name,
        last_name: dto.last_name,
        password: dto.password,
    };

    let user = state.user_service.register(req).await?;
    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not this user"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> AppResult<Json<UserDto>> {
    let req = UpdateUserRequest {
        username: dto.username,
        first_name: dto.first_name,
        last_name: dto.last_name,
        password: dto.password,
    };

    let user = state.user_service.update_user(actor, id, req).await?;
    Ok(Json(UserDto::from(user)))
}
