use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, Method, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::policy::{self, Access, Actor};
use crate::infrastructure::jwt::TokenType;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

/// Actor resolved by [`resolve_actor`]; anonymous when no credentials were sent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestActor(pub(crate) Actor);

impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(actor_of(parts)))
    }
}

/// Actor of a write request. Anonymous callers are rejected with 401 here,
/// before any later extractor touches the path or the body.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WriterActor(pub(crate) Actor);

impl<S> FromRequestParts<S> for WriterActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = actor_of(parts);
        policy::identity_required(actor, write_access(&parts.method)).into_result()?;
        Ok(Self(actor))
    }
}

fn actor_of(parts: &Parts) -> Actor {
    parts
        .extensions
        .get::<Actor>()
        .copied()
        .unwrap_or(Actor::Anonymous)
}

fn write_access(method: &Method) -> Access {
    match *method {
        Method::POST => Access::Create,
        Method::DELETE => Access::Delete,
        _ => Access::Update,
    }
}

/// No `Authorization` header means an anonymous actor. A header that is
/// present but does not carry a valid access token is rejected with 401.
/// The actor is also copied onto the response for the access log.
pub(crate) async fn resolve_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let actor = match request.headers().get(header::AUTHORIZATION) {
        None => Actor::Anonymous,
        Some(value) => {
            let token = bearer_token(value).ok_or(DomainError::InvalidToken)?;
            let claims = state
                .jwt
                .verify_token_of_type(token, TokenType::Access)
                .map_err(|err| {
                    debug!(error = %err, "bearer token rejected");
                    DomainError::InvalidToken
                })?;
            Actor::User(claims.user_id)
        }
    };

    request.extensions_mut().insert(actor);
    let mut response = next.run(request).await;
    response.extensions_mut().insert(actor);
    Ok(response)
}

fn bearer_token(value: &HeaderValue) -> Option<&str> {
    let mut parts = value.to_str().ok()?.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}
