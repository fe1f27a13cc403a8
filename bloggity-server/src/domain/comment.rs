use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::post::{normalize_content, validate_positive_i64, validate_timestamps};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateCommentRequest {
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

impl CreateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            author_id: self.author_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdateCommentRequest {
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

impl UpdateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            content: normalize_content(&self.content)?,
            author_id: self.author_id,
        })
    }
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        post_id: i64,
        author_id: i64,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("post_id", post_id)?;
        validate_positive_i64("author_id", author_id)?;
        let content = normalize_content(&content.into())?;
        validate_timestamps(created_at, updated_at)?;

        Ok(Self {
            id,
            post_id,
            author_id,
            content,
            created_at,
            updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Comment, CreateCommentRequest, DomainError};

    #[test]
    fn create_comment_request_trims_content() {
        let req = CreateCommentRequest {
            content: "  nice post  ".to_string(),
            author_id: None,
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.content, "nice post");
    }

    #[test]
    fn create_comment_request_rejects_blank_content() {
        let req = CreateCommentRequest {
            content: " ".to_string(),
            author_id: Some(1),
        };

        let err = req.validate().expect_err("blank content must fail");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "content",
                ..
            }
        ));
    }

    #[test]
    fn comment_new_rejects_non_positive_post_id() {
        let now = Utc::now();
        let err = Comment::new(1, 0, 1, "text", now, now).expect_err("post_id must be > 0");
        assert!(matches!(
            err,
            DomainError::Validation {
                field: "post_id",
                ..
            }
        ));
    }
}
