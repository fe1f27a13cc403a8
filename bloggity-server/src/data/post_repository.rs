use async_trait::async_trait;

use super::Pagination;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostEntry};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) content: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PostFilter {
    /// Exact title match.
    pub(crate) title: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn get_post_with_comments(&self, id: i64) -> Result<Option<PostEntry>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    async fn list_all(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError>;
    /// Same page as [`PostRepository::list_all`], with every post's comments
    /// loaded in one batch.
    async fn list_all_with_comments(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostEntry>, DomainError>;
    async fn total_posts(&self, filter: &PostFilter) -> Result<i64, DomainError>;
}
