use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::Pagination;
use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, author_id, content, created_at, updated_at
            "#,
        )
        .bind(input.post_id)
        .bind(input.author_id)
        .bind(input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        map_row_to_comment(row)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1 AND post_id = $2
            "#,
        )
        .bind(id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn update_comment_owned(
        &self,
        post_id: i64,
        id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET content = $4,
                updated_at = NOW()
            WHERE id = $1 AND post_id = $2 AND author_id = $3
            RETURNING id, post_id, author_id, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(post_id)
        .bind(owner_id)
        .bind(patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        row.map(map_row_to_comment).transpose()
    }

    async fn delete_comment(&self, post_id: i64, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1 AND post_id = $2
            "#,
        )
        .bind(id)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_post(
        &self,
        post_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(post_id)
        .bind(i64::from(pagination.limit))
        .bind(i64::from(pagination.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        rows.into_iter().map(map_row_to_comment).collect()
    }

    async fn total_for_post(&self, post_id: i64) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)
    }
}

pub(super) fn map_row_to_comment(row: CommentRow) -> Result<Comment, DomainError> {
    Comment::new(
        row.id,
        row.post_id,
        row.author_id,
        row.content,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_post_id_fkey") => "post",
            _ => "author",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
