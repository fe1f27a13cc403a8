use axum::{Router, middleware, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::health::healthz;
use crate::presentation::http::middleware::auth::resolve_actor;

pub(crate) mod posts;
pub(crate) mod token;
pub(crate) mod users;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    // route_layer keeps unmatched methods on a plain 405
    let resources = Router::new()
        .nest("/api/users", users::router())
        .nest("/api/posts", posts::router())
        .route_layer(middleware::from_fn_with_state(state, resolve_actor));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api/token", token::router())
        .merge(resources)
}
