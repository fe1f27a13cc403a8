use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PaginationQuery;
use crate::application::comment_service::ListCommentsResult;
use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::policy::{self, Access};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::middleware::auth::WriterActor;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCommentDto {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

/// Validated by the service after the comment's author is matched.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateCommentDto {
    #[serde(default)]
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListCommentsResponseDto {
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

impl From<ListCommentsResult> for ListCommentsResponseDto {
    fn from(result: ListCommentsResult) -> Self {
        Self {
            comments: result.comments.into_iter().map(CommentDto::from).collect(),
            limit: result.pagination.limit,
            offset: result.pagination.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Comments of the post", body = ListCommentsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_comments(
    State(state): State<AppState>,
    AppPath(post_id): AppPath<i64>,
    AppQuery(query): AppQuery<PaginationQuery>,
) -> AppResult<Json<ListCommentsResponseDto>> {
    query.validate()?;
    let result = state
        .comment_service
        .list_comments(post_id, query.pagination())
        .await?;
    Ok(Json(ListCommentsResponseDto::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}/comments/{id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment found", body = CommentDto),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_comment(
    State(state): State<AppState>,
    AppPath((post_id, id)): AppPath<(i64, i64)>,
) -> AppResult<Json<CommentDto>> {
    let comment = state.comment_service.get_comment(post_id, id).await?;
    Ok(Json(CommentDto::from(comment)))
}

#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Declared author is not the caller"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath(post_id): AppPath<i64>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    policy::authored_collection_access(actor, Access::Create, dto.author_id).into_result()?;
    dto.validate()?;

    let req = CreateCommentRequest {
        content: dto.content,
        author_id: dto.author_id,
    };

    let comment = state
        .comment_service
        .create_comment(actor, post_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(CommentDto::from(comment))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{post_id}/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = UpdateCommentDto,
    responses(
        (status = 200, description = "Comment updated", body = CommentDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_comment(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath((post_id, id)): AppPath<(i64, i64)>,
    AppJson(dto): AppJson<UpdateCommentDto>,
) -> AppResult<Json<CommentDto>> {
    let req = UpdateCommentRequest {
        content: dto.content,
        author_id: dto.author_id,
    };

    let comment = state
        .comment_service
        .update_comment(actor, post_id, id, req)
        .await?;
    Ok(Json(CommentDto::from(comment)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/comments/{id}",
    tag = "comments",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Parent post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post or comment not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath((post_id, id)): AppPath<(i64, i64)>,
) -> AppResult<StatusCode> {
    state
        .comment_service
        .delete_comment(actor, post_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
