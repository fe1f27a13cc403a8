use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::users::UserDto;
use crate::domain::user::LoginRequest;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::AppJson;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ObtainTokenDto {
    #[validate(length(min = 1, max = 150))]
    pub(crate) username: String,
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RefreshTokenDto {
    #[validate(length(min = 1))]
    pub(crate) refresh: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct VerifyTokenDto {
    #[validate(length(min = 1))]
    pub(crate) token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokenPairDto {
    pub(crate) access: String,
    pub(crate) refresh: String,
    pub(crate) user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct AccessTokenDto {
    pub(crate) access: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TokenVerifiedDto {}

#[utoipa::path(
    post,
    path = "/api/token",
    tag = "token",
    request_body = ObtainTokenDto,
    responses(
        (status = 200, description = "Access and refresh tokens issued", body = TokenPairDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn obtain_token(
    State(state): State<AppState>,
    AppJson(dto): AppJson<ObtainTokenDto>,
) -> AppResult<Json<TokenPairDto>> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };

    let pair = state.auth_service.obtain_tokens(req).await?;

    Ok(Json(TokenPairDto {
        access: pair.access_token,
        refresh: pair.refresh_token,
        user: pair.user.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/token/refresh",
    tag = "token",
    request_body = RefreshTokenDto,
    responses(
        (status = 200, description = "New access token", body = AccessTokenDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid, expired or non-refresh token"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn refresh_token(
    State(state): State<AppState>,
    AppJson(dto): AppJson<RefreshTokenDto>,
) -> AppResult<Json<AccessTokenDto>> {
    dto.validate()?;
    let access = state.auth_service.refresh(&dto.refresh).await?;
    Ok(Json(AccessTokenDto { access }))
}

#[utoipa::path(
    post,
    path = "/api/token/verify",
    tag = "token",
    request_body = VerifyTokenDto,
    responses(
        (status = 200, description = "Token is valid", body = TokenVerifiedDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub(crate) async fn verify_token(
    State(state): State<AppState>,
    AppJson(dto): AppJson<VerifyTokenDto>,
) -> AppResult<Json<TokenVerifiedDto>> {
    dto.validate()?;
    state.auth_service.verify(&dto.token)?;
    Ok(Json(TokenVerifiedDto {}))
}
