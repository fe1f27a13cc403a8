use std::time::Instant;

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::info;

use crate::domain::policy::Actor;

/// One line per request: who called, from which client, and how long it took.
pub(crate) async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    info!(
        target: "bloggity_server::access",
        %method,
        %path,
        status = response.status().as_u16(),
        actor = %actor_label(response.extensions().get::<Actor>()),
        %user_agent,
        latency_ms,
        "request handled"
    );
    response
}

fn actor_label(actor: Option<&Actor>) -> String {
    match actor {
        Some(Actor::User(id)) => format!("user:{id}"),
        Some(Actor::Anonymous) | None => "anonymous".to_string(),
    }
}
