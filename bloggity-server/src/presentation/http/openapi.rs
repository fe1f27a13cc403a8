use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::PaginationQuery;
use crate::presentation::http::handlers::comments::{
    CommentDto, CreateCommentDto, ListCommentsResponseDto, UpdateCommentDto,
};
use crate::presentation::http::handlers::health::HealthDto;
use crate::presentation::http::handlers::posts::{
    CreatePostDto, ListPostsQuery, ListPostsResponseDto, PostDto, PostViewQuery, UpdatePostDto,
};
use crate::presentation::http::handlers::token::{
    AccessTokenDto, ObtainTokenDto, RefreshTokenDto, TokenPairDto, TokenVerifiedDto,
    VerifyTokenDto,
};
use crate::presentation::http::handlers::users::{
    ListUsersResponseDto, RegisterDto, UpdateUserDto, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::health::healthz,
        crate::presentation::http::handlers::token::obtain_token,
        crate::presentation::http::handlers::token::refresh_token,
        crate::presentation::http::handlers::token::verify_token,
        crate::presentation::http::handlers::users::list_users,
        crate::presentation::http::handlers::users::get_user,
        crate::presentation::http::handlers::users::register,
        crate::presentation::http::handlers::users::update_user,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::comments::list_comments,
        crate::presentation::http::handlers::comments::get_comment,
        crate::presentation::http::handlers::comments::create_comment,
        crate::presentation::http::handlers::comments::update_comment,
        crate::presentation::http::handlers::comments::delete_comment
    ),
    components(
        schemas(
            HealthDto,
            ObtainTokenDto,
            RefreshTokenDto,
            VerifyTokenDto,
            TokenPairDto,
            AccessTokenDto,
            TokenVerifiedDto,
            RegisterDto,
            UpdateUserDto,
            UserDto,
            ListUsersResponseDto,
            PaginationQuery,
            CreatePostDto,
            UpdatePostDto,
            ListPostsQuery,
            PostViewQuery,
            PostDto,
            ListPostsResponseDto,
            CreateCommentDto,
            UpdateCommentDto,
            CommentDto,
            ListCommentsResponseDto
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "token", description = "JWT issue, refresh and verification"),
        (name = "users", description = "User endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "comments", description = "Comments nested under a post")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
