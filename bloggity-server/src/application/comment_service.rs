use std::sync::Arc;

use crate::data::Pagination;
use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::policy::{self, Access, Actor};

#[derive(Debug, Clone)]
pub(crate) struct ListCommentsResult {
    pub(crate) comments: Vec<Comment>,
    pub(crate) pagination: Pagination,
    pub(crate) total: i64,
}

/// Comments always live under a post: every operation first resolves the
/// parent and answers 404 for a post that does not exist.
pub(crate) struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub(crate) fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn create_comment(
        &self,
        actor: Actor,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let author_id = actor.require_user()?;
        let req = req.validate()?;
        self.ensure_post(post_id).await?;

        self.comments
            .create_comment(NewComment {
                post_id,
                author_id,
                content: req.content,
            })
            .await
    }

    pub(crate) async fn get_comment(&self, post_id: i64, id: i64) -> Result<Comment, DomainError> {
        self.ensure_post(post_id).await?;
        self.load_comment(post_id, id).await
    }

    pub(crate) async fn list_comments(
        &self,
        post_id: i64,
        pagination: Pagination,
    ) -> Result<ListCommentsResult, DomainError> {
        self.ensure_post(post_id).await?;
        let comments = self.comments.list_for_post(post_id, pagination).await?;
        let total = self.comments.total_for_post(post_id).await?;

        Ok(ListCommentsResult {
            comments,
            pagination,
            total,
        })
    }

    pub(crate) async fn update_comment(
        &self,
        actor: Actor,
        post_id: i64,
        id: i64,
        req: UpdateCommentRequest,
    ) -> Result<Comment, DomainError> {
        self.ensure_post(post_id).await?;
        let original = self.load_comment(post_id, id).await?;
        policy::authored_instance_access(actor, Access::Update, original.author_id)
            .into_result()?;
        let actor_id = actor.require_user()?;
        let req = req.validate()?;

        if req
            .author_id
            .is_some_and(|author_id| author_id != original.author_id)
        {
            return Err(DomainError::Forbidden);
        }

        self.comments
            .update_comment_owned(
                post_id,
                id,
                actor_id,
                CommentPatch {
                    content: req.content,
                },
            )
            .await?
            .ok_or_else(|| comment_not_found(post_id, id))
    }

    pub(crate) async fn delete_comment(
        &self,
        actor: Actor,
        post_id: i64,
        id: i64,
    ) -> Result<(), DomainError> {
        self.ensure_post(post_id).await?;
        let original = self.load_comment(post_id, id).await?;
        policy::authored_instance_access(actor, Access::Delete, original.author_id)
            .into_result()?;

        if !self.comments.delete_comment(post_id, id).await? {
            return Err(comment_not_found(post_id, id));
        }
        Ok(())
    }

    async fn ensure_post(&self, post_id: i64) -> Result<(), DomainError> {
        match self.posts.get_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("post id: {post_id}"))),
        }
    }

    async fn load_comment(&self, post_id: i64, id: i64) -> Result<Comment, DomainError> {
        self.comments
            .get_comment(post_id, id)
            .await?
            .ok_or_else(|| comment_not_found(post_id, id))
    }
}

fn comment_not_found(post_id: i64, id: i64) -> DomainError {
    DomainError::NotFound(format!("comment id: {id} in post id: {post_id}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::CommentService;
    use crate::data::Pagination;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::data::repositories::memory::MemoryStore;
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::comment::{CreateCommentRequest, UpdateCommentRequest};
    use crate::domain::error::DomainError;
    use crate::domain::policy::Actor;

    struct Fixture {
        service: CommentService,
        store: MemoryStore,
        alice: i64,
        bob: i64,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let alice = add_user(&store, "alice").await;
        let bob = add_user(&store, "bob").await;
        let service = CommentService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        Fixture {
            service,
            store,
            alice,
            bob,
        }
    }

    async fn add_user(store: &MemoryStore, username: &str) -> i64 {
        store
            .create_user(NewUser {
                username: username.to_string(),
                first_name: "First".to_string(),
                last_name: "Last".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("user must be created")
            .id
    }

    async fn add_post(store: &MemoryStore, author_id: i64) -> i64 {
        store
            .create_post(NewPost {
                title: "title".to_string(),
                content: "content".to_string(),
                author_id,
            })
            .await
            .expect("post must be created")
            .id
    }

    fn create_req(content: &str) -> CreateCommentRequest {
        CreateCommentRequest {
            content: content.to_string(),
            author_id: None,
        }
    }

    #[tokio::test]
    async fn create_comment_on_missing_post_is_not_found() {
        let fx = fixture().await;

        let err = fx
            .service
            .create_comment(Actor::User(fx.alice), 999, create_req("hi"))
            .await
            .expect_err("post is missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn anonymous_comment_is_unauthorized() {
        let fx = fixture().await;
        let post_id = add_post(&fx.store, fx.alice).await;

        let err = fx
            .service
            .create_comment(Actor::Anonymous, post_id, create_req("hi"))
            .await
            .expect_err("anonymous must be rejected");
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn comments_are_scoped_to_their_post() {
        let fx = fixture().await;
        let first = add_post(&fx.store, fx.alice).await;
        let second = add_post(&fx.store, fx.alice).await;

        let comment = fx
            .service
            .create_comment(Actor::User(fx.bob), first, create_req("on first"))
            .await
            .expect("comment must be created");
        assert_eq!(comment.post_id, first);
        assert_eq!(comment.author_id, fx.bob);

        let err = fx
            .service
            .get_comment(second, comment.id)
            .await
            .expect_err("comment must not leak into another post");
        assert!(matches!(err, DomainError::NotFound(_)));

        let listed = fx
            .service
            .list_comments(second, Pagination::new(None, None))
            .await
            .expect("list must succeed");
        assert!(listed.comments.is_empty());
        assert_eq!(listed.total, 0);

        let listed = fx
            .service
            .list_comments(first, Pagination::new(None, None))
            .await
            .expect("list must succeed");
        assert_eq!(listed.total, 1);
    }

    #[tokio::test]
    async fn only_comment_author_may_edit() {
        let fx = fixture().await;
        let post_id = add_post(&fx.store, fx.alice).await;
        let comment = fx
            .service
            .create_comment(Actor::User(fx.bob), post_id, create_req("mine"))
            .await
            .expect("comment must be created");

        let err = fx
            .service
            .update_comment(
                Actor::User(fx.alice),
                post_id,
                comment.id,
                UpdateCommentRequest {
                    content: "hijack".to_string(),
                    author_id: None,
                },
            )
            .await
            .expect_err("post author is not comment author");
        assert!(matches!(err, DomainError::Forbidden));

        let updated = fx
            .service
            .update_comment(
                Actor::User(fx.bob),
                post_id,
                comment.id,
                UpdateCommentRequest {
                    content: "  edited ".to_string(),
                    author_id: Some(fx.bob),
                },
            )
            .await
            .expect("author may edit");
        assert_eq!(updated.content, "edited");
    }

    #[tokio::test]
    async fn update_comment_checks_owner_before_payload() {
        let fx = fixture().await;
        let post_id = add_post(&fx.store, fx.alice).await;
        let comment = fx
            .service
            .create_comment(Actor::User(fx.bob), post_id, create_req("mine"))
            .await
            .expect("comment must be created");
        let blank = || UpdateCommentRequest {
            content: " ".to_string(),
            author_id: None,
        };

        let err = fx
            .service
            .update_comment(Actor::User(fx.alice), post_id, comment.id, blank())
            .await
            .expect_err("alice is not the comment author");
        assert!(matches!(err, DomainError::Forbidden));

        let err = fx
            .service
            .update_comment(Actor::User(fx.bob), 999, comment.id, blank())
            .await
            .expect_err("post is missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_comment_checks_owner_then_removes() {
        let fx = fixture().await;
        let post_id = add_post(&fx.store, fx.alice).await;
        let comment = fx
            .service
            .create_comment(Actor::User(fx.bob), post_id, create_req("bye"))
            .await
            .expect("comment must be created");

        let err = fx
            .service
            .delete_comment(Actor::Anonymous, post_id, comment.id)
            .await
            .expect_err("anonymous delete must fail");
        assert!(matches!(err, DomainError::Unauthorized));

        fx.service
            .delete_comment(Actor::User(fx.bob), post_id, comment.id)
            .await
            .expect("author may delete");

        let err = fx
            .service
            .get_comment(post_id, comment.id)
            .await
            .expect_err("comment must be gone");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
