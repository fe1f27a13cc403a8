use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::{
    create_comment, delete_comment, get_comment, list_comments, update_comment,
};
use crate::presentation::http::handlers::posts::{
    create_post, delete_post, get_post, list_posts, update_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{post_id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route(
            "/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/{post_id}/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}
