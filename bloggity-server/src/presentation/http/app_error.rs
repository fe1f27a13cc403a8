use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request timed out")]
    Timeout,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<FieldErrors>,
}

impl AppError {
    fn parts(self) -> (StatusCode, String, Option<FieldErrors>) {
        match self {
            AppError::Domain(err) => match &err {
                DomainError::Validation { field, message } => {
                    let details = BTreeMap::from([(field.to_string(), vec![message.to_string()])]);
                    (StatusCode::BAD_REQUEST, err.to_string(), Some(details))
                }
                DomainError::AlreadyExists(_) => (StatusCode::BAD_REQUEST, err.to_string(), None),
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string(), None),
                DomainError::Unauthorized
                | DomainError::InvalidCredentials
                | DomainError::InvalidToken => (StatusCode::UNAUTHORIZED, err.to_string(), None),
                DomainError::Forbidden => (StatusCode::FORBIDDEN, err.to_string(), None),
                DomainError::Unexpected(cause) => {
                    error!(cause = %cause, "unexpected domain error");
                    internal()
                }
            },
            AppError::Validation(err) => {
                let details = validation_details(&err);
                (
                    StatusCode::BAD_REQUEST,
                    "validation failed".to_string(),
                    Some(details),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "request timed out".to_string(),
                None,
            ),
            AppError::Internal(err) => {
                error!(error = ?err, "internal error");
                internal()
            }
        }
    }
}

fn internal() -> (StatusCode, String, Option<FieldErrors>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
        None,
    )
}

fn validation_details(err: &ValidationErrors) -> FieldErrors {
    err.field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();
        (status, Json(ErrorBody { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use validator::Validate;

    use super::AppError;
    use crate::domain::error::DomainError;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3))]
        name: String,
    }

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn identity_and_ownership_failures_stay_distinct() {
        assert_eq!(
            status_of(DomainError::Unauthorized.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(DomainError::InvalidToken.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(DomainError::Forbidden.into()), StatusCode::FORBIDDEN);
    }

    #[test]
    fn duplicate_is_a_bad_request() {
        assert_eq!(
            status_of(DomainError::AlreadyExists("username".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unexpected_is_hidden_behind_500() {
        assert_eq!(
            status_of(DomainError::Unexpected("db down".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn dto_validation_reports_field_details() {
        let err = Probe {
            name: "x".to_string(),
        }
        .validate()
        .expect_err("name is too short");
        let (status, _, details) = AppError::from(err).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let details = details.expect("details must be present");
        assert_eq!(details.get("name").map(Vec::len), Some(1));
    }
}
