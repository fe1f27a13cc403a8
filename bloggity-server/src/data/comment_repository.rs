use async_trait::async_trait;

use super::Pagination;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPatch {
    pub(crate) content: String,
}

/// Every lookup is keyed by the parent post as well as the comment id, so a
/// comment is never reachable under a post it does not belong to.
#[async_trait]
pub(crate) trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError>;
    async fn update_comment_owned(
        &self,
        post_id: i64,
        id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete_comment(&self, post_id: i64, id: i64) -> Result<bool, DomainError>;
    async fn list_for_post(
        &self,
        post_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Comment>, DomainError>;
    async fn total_for_post(&self, post_id: i64) -> Result<i64, DomainError>;
}
