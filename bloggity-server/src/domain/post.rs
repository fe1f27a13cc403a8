use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use super::error::DomainError;

pub(crate) const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            author_id: self.author_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UpdatePostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: Option<i64>,
}

impl UpdatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            content: normalize_content(&self.content)?,
            author_id: self.author_id,
        })
    }
}

/// Shape of a post in responses, chosen from the `include_comments` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostView {
    Minimal,
    WithComments,
}

impl PostView {
    pub(crate) fn select(include_comments: bool) -> Self {
        if include_comments {
            PostView::WithComments
        } else {
            PostView::Minimal
        }
    }
}

/// A post together with its comments, when the view asked for them.
#[derive(Debug, Clone)]
pub(crate) struct PostEntry {
    pub(crate) post: Post,
    pub(crate) comments: Option<Vec<Comment>>,
}

impl PostEntry {
    pub(crate) fn minimal(post: Post) -> Self {
        Self {
            post,
            comments: None,
        }
    }

    pub(crate) fn with_comments(post: Post, comments: Vec<Comment>) -> Self {
        Self {
            post,
            comments: Some(comments),
        }
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        author_id: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;
        let title = normalize_title(&title.into())?;
        let content = normalize_content(&content.into())?;
        validate_timestamps(created_at, updated_at)?;

        Ok(Self {
            id,
            title,
            content,
            author_id,
            created_at,
            updated_at,
        })
    }
}

pub(super) fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}

pub(super) fn validate_timestamps(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<(), DomainError> {
    if updated_at < created_at {
        return Err(DomainError::Validation {
            field: "updated_at",
            message: "must be >= created_at",
        });
    }
    Ok(())
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..100 chars",
        });
    }
    Ok(title.to_string())
}

pub(super) fn normalize_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::Validation {
            field: "content",
            message: "must not be empty",
        });
    }
    Ok(content.to_string())
}
