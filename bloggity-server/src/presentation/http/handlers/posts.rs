use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::comments::CommentDto;
use crate::application::blog_service::ListPostsResult;
use crate::data::Pagination;
use crate::data::post_repository::PostFilter;
use crate::domain::policy::{self, Access};
use crate::domain::post::{CreatePostRequest, Post, PostEntry, PostView, UpdatePostRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{AppJson, AppPath, AppQuery};
use crate::presentation::http::middleware::auth::WriterActor;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub(crate) title: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub(crate) content: String,
    /// Must equal the caller's id when given.
    pub(crate) author_id: Option<i64>,
}

/// Checked by the service only after the post is loaded and its author
/// matched, so missing fields decode as empty and fail there.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct ListPostsQuery {
    pub(crate) title: Option<String>,
    pub(crate) include_comments: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct PostViewQuery {
    pub(crate) include_comments: Option<String>,
}

/// Only the literal `true` embeds comments; any other value keeps the
/// minimal view.
fn view_of(include_comments: Option<&str>) -> PostView {
    PostView::select(include_comments == Some("true"))
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    /// Present only when `include_comments=true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comments: Option<Vec<CommentDto>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: i64,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        PostDto::from(PostEntry::minimal(post))
    }
}

impl From<PostEntry> for PostDto {
    fn from(entry: PostEntry) -> Self {
        let post = entry.post;
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments: entry
                .comments
                .map(|comments| comments.into_iter().map(CommentDto::from).collect()),
        }
    }
}

impl From<ListPostsResult> for ListPostsResponseDto {
    fn from(result: ListPostsResult) -> Self {
        Self {
            posts: result.posts.into_iter().map(PostDto::from).collect(),
            limit: result.pagination.limit,
            offset: result.pagination.offset,
            total: result.total,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("title" = Option<String>, Query, description = "Exact title match"),
        ("include_comments" = Option<String>, Query, description = "`true` embeds comments of every post"),
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Posts listed", body = ListPostsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListPostsQuery>,
) -> AppResult<Json<ListPostsResponseDto>> {
    query.validate()?;
    let view = view_of(query.include_comments.as_deref());
    let filter = PostFilter { title: query.title };
    let pagination = Pagination::new(query.limit, query.offset);

    let result = state
        .blog_service
        .list_posts(filter, pagination, view)
        .await?;

    Ok(Json(ListPostsResponseDto::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    tag = "posts",
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("include_comments" = Option<String>, Query, description = "`true` embeds the post's comments")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 400, description = "Malformed query"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppQuery(query): AppQuery<PostViewQuery>,
) -> AppResult<Json<PostDto>> {
    let view = view_of(query.include_comments.as_deref());
    let entry = state.blog_service.get_post(id, view).await?;

    Ok(Json(PostDto::from(entry)))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Declared author is not the caller"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppJson(dto): AppJson<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    policy::authored_collection_access(actor, Access::Create, dto.author_id).into_result()?;
    dto.validate()?;

    let req = CreatePostRequest {
        title: dto.title,
        content: dto.content,
        author_id: dto.author_id,
    };

    let post = state.blog_service.create_post(actor, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    put,
    path = "/api/posts/{post_id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    let req = UpdatePostRequest {
        title: dto.title,
        content: dto.content,
        author_id: dto.author_id,
    };

    let post = state.blog_service.update_post(actor, id, req).await?;
    Ok(Json(PostDto::from(post)))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    tag = "posts",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    WriterActor(actor): WriterActor,
    AppPath(id): AppPath<i64>,
) -> AppResult<StatusCode> {
    state.blog_service.delete_post(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
