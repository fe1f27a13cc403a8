use axum::{Router, routing::post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::token::{obtain_token, refresh_token, verify_token};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(obtain_token))
        .route("/refresh", post(refresh_token))
        .route("/verify", post(verify_token))
}
