use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `bloggity-client`.
pub enum BloggityClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Операция требует токен, но он не сохранён в клиенте.
    #[error("no token stored, log in first")]
    MissingToken,

    /// Сервер не смог установить личность (нет/некорректен токен, неверный пароль).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Личность установлена, но ресурс принадлежит другому пользователю.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Запрошенный ресурс не найден.
    #[error("not found: {0}")]
    NotFound(String),

    /// Метод не поддерживается для ресурса (например, удаление пользователя).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Некорректный запрос или ошибка валидации.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Ошибка на стороне сервера.
    #[error("server error: {0}")]
    Server(String),
}

/// Результат операций `bloggity-client`.
pub type BloggityClientResult<T> = Result<T, BloggityClientError>;

/// Тело ошибки, которое возвращает сервер.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponseDto {
    pub(crate) error: Option<String>,
    pub(crate) details: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponseDto {
    /// Сообщение вместе с ошибками по полям: `validation failed (title: length)`.
    pub(crate) fn into_message(self, status: reqwest::StatusCode) -> String {
        let message = self
            .error
            .unwrap_or_else(|| format!("http status {status}"));
        match self.details {
            Some(details) if !details.is_empty() => {
                let fields = details
                    .into_iter()
                    .map(|(field, errors)| format!("{field}: {}", errors.join(", ")))
                    .collect::<Vec<_>>()
                    .join("; ");
                format!("{message} ({fields})")
            }
            _ => message,
        }
    }
}

impl BloggityClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: String) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            reqwest::StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed,
            status if status.is_server_error() => Self::Server(message),
            _ => Self::InvalidRequest(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{BloggityClientError, ErrorResponseDto};

    #[test]
    fn statuses_map_to_distinct_errors() {
        let msg = || "m".to_string();
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::UNAUTHORIZED, msg()),
            BloggityClientError::Unauthorized(_)
        ));
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::FORBIDDEN, msg()),
            BloggityClientError::Forbidden(_)
        ));
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::NOT_FOUND, msg()),
            BloggityClientError::NotFound(_)
        ));
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::METHOD_NOT_ALLOWED, msg()),
            BloggityClientError::MethodNotAllowed
        ));
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::BAD_REQUEST, msg()),
            BloggityClientError::InvalidRequest(_)
        ));
        assert!(matches!(
            BloggityClientError::from_http_status(StatusCode::BAD_GATEWAY, msg()),
            BloggityClientError::Server(_)
        ));
    }

    #[test]
    fn error_message_includes_field_details() {
        let body: ErrorResponseDto = serde_json::from_str(
            r#"{"error":"validation failed","details":{"title":["length"],"content":["length"]}}"#,
        )
        .expect("body must parse");

        assert_eq!(
            body.into_message(StatusCode::BAD_REQUEST),
            "validation failed (content: length; title: length)"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let message = ErrorResponseDto::default().into_message(StatusCode::BAD_REQUEST);
        assert_eq!(message, "http status 400 Bad Request");
    }
}
