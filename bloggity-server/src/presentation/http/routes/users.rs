use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{get_user, list_users, register, update_user};

/// No delete route: users cannot be removed through the API.
pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/{id}", get(get_user).put(update_user))
}
