use std::sync::Arc;

use crate::data::Pagination;
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::policy::{self, Access, Actor};
use crate::domain::post::{CreatePostRequest, Post, PostEntry, PostView, UpdatePostRequest};

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<PostEntry>,
    pub(crate) pagination: Pagination,
    pub(crate) total: i64,
}

pub(crate) struct BlogService {
    repo: Arc<dyn PostRepository>,
}

impl BlogService {
    pub(crate) fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Stamps the actor as author. The declared `author_id`, if any, has
    /// already been matched against the actor by the caller.
    pub(crate) async fn create_post(
        &self,
        actor: Actor,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let author_id = actor.require_user()?;
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            author_id,
        };
        self.repo.create_post(new_post).await
    }

    pub(crate) async fn get_post(&self, id: i64, view: PostView) -> Result<PostEntry, DomainError> {
        let entry = match view {
            PostView::Minimal => self.repo.get_post(id).await?.map(PostEntry::minimal),
            PostView::WithComments => self.repo.get_post_with_comments(id).await?,
        };
        entry.ok_or_else(|| post_not_found(id))
    }

    pub(crate) async fn update_post(
        &self,
        actor: Actor,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let original_post = self.load_post(post_id).await?;
        policy::authored_instance_access(actor, Access::Update, original_post.author_id)
            .into_result()?;
        let actor_id = actor.require_user()?;
        let req = req.validate()?;

        // переназначение автора не поддерживается
        if req
            .author_id
            .is_some_and(|author_id| author_id != original_post.author_id)
        {
            return Err(DomainError::Forbidden);
        }

        let patch = PostPatch {
            title: req.title,
            content: req.content,
        };
        self.repo
            .update_post_owned(post_id, actor_id, patch)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }

    pub(crate) async fn delete_post(&self, actor: Actor, post_id: i64) -> Result<(), DomainError> {
        let original_post = self.load_post(post_id).await?;
        policy::authored_instance_access(actor, Access::Delete, original_post.author_id)
            .into_result()?;

        let deleted = self.repo.delete_post(post_id).await?;
        if !deleted {
            return Err(post_not_found(post_id));
        }
        Ok(())
    }

    pub(crate) async fn list_posts(
        &self,
        filter: PostFilter,
        pagination: Pagination,
        view: PostView,
    ) -> Result<ListPostsResult, DomainError> {
        let posts = match view {
            PostView::Minimal => self
                .repo
                .list_all(&filter, pagination)
                .await?
                .into_iter()
                .map(PostEntry::minimal)
                .collect(),
            PostView::WithComments => self.repo.list_all_with_comments(&filter, pagination).await?,
        };
        let total = self.repo.total_posts(&filter).await?;

        Ok(ListPostsResult {
            posts,
            pagination,
            total,
        })
    }

    async fn load_post(&self, post_id: i64) -> Result<Post, DomainError> {
        self.repo
            .get_post(post_id)
            .await?
            .ok_or_else(|| post_not_found(post_id))
    }
}

fn post_not_found(id: i64) -> DomainError {
    DomainError::NotFound(format!("post id: {id}"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::BlogService;
    use crate::data::Pagination;
    use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
    use crate::domain::comment::Comment;
    use crate::domain::error::DomainError;
    use crate::domain::policy::Actor;
    use crate::domain::post::{CreatePostRequest, Post, PostEntry, PostView, UpdatePostRequest};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        comments_for_get: Arc<Mutex<Vec<Comment>>>,
        update_owned_call: Arc<Mutex<Option<(i64, i64, PostPatch)>>>,
        delete_called: Arc<Mutex<bool>>,
        list_calls: Arc<Mutex<Vec<&'static str>>>,
        list_result: Arc<Mutex<Vec<Post>>>,
        total_result: Arc<Mutex<i64>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_get: Arc::new(Mutex::new(None)),
                comments_for_get: Arc::new(Mutex::new(Vec::new())),
                update_owned_call: Arc::new(Mutex::new(None)),
                delete_called: Arc::new(Mutex::new(false)),
                list_calls: Arc::new(Mutex::new(Vec::new())),
                list_result: Arc::new(Mutex::new(Vec::new())),
                total_result: Arc::new(Mutex::new(0)),
            }
        }

        fn with_post(post: Post) -> Self {
            let repo = Self::new();
            *repo
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned") = Some(post);
            repo
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(1, &input.title, input.author_id))
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn get_post_with_comments(&self, id: i64) -> Result<Option<PostEntry>, DomainError> {
            let comments = self
                .comments_for_get
                .lock()
                .expect("comments_for_get mutex poisoned")
                .clone();
            Ok(self
                .get_post(id)
                .await?
                .map(|post| PostEntry::with_comments(post, comments)))
        }

        async fn update_post_owned(
            &self,
            post_id: i64,
            owner_id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self
                .update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned") =
                Some((post_id, owner_id, patch.clone()));
            Ok(Some(sample_post(post_id, &patch.title, owner_id)))
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            *self
                .delete_called
                .lock()
                .expect("delete_called mutex poisoned") = true;
            Ok(true)
        }

        async fn list_all(
            &self,
            _filter: &PostFilter,
            _pagination: Pagination,
        ) -> Result<Vec<Post>, DomainError> {
            self.list_calls
                .lock()
                .expect("list_calls mutex poisoned")
                .push("list_all");
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }

        async fn list_all_with_comments(
            &self,
            _filter: &PostFilter,
            _pagination: Pagination,
        ) -> Result<Vec<PostEntry>, DomainError> {
            self.list_calls
                .lock()
                .expect("list_calls mutex poisoned")
                .push("list_all_with_comments");
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .iter()
                .cloned()
                .map(|post| PostEntry::with_comments(post, Vec::new()))
                .collect())
        }

        async fn total_posts(&self, _filter: &PostFilter) -> Result<i64, DomainError> {
            Ok(*self
                .total_result
                .lock()
                .expect("total_result mutex poisoned"))
        }
    }

    #[tokio::test]
    async fn create_post_stamps_actor_as_author() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(Arc::new(repo.clone()));

        let req = CreatePostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
            author_id: None,
        };

        let created = service
            .create_post(Actor::User(10), req)
            .await
            .expect("create_post must succeed");
        assert_eq!(created.author_id, 10);

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "title");
        assert_eq!(input.content, "content");
        assert_eq!(input.author_id, 10);
    }

    #[tokio::test]
    async fn create_post_requires_identity() {
        let repo = FakePostRepo::new();
        let service = BlogService::new(Arc::new(repo.clone()));

        let req = CreatePostRequest {
            title: "title".to_string(),
            content: "content".to_string(),
            author_id: None,
        };

        let err = service
            .create_post(Actor::Anonymous, req)
            .await
            .expect_err("anonymous create must fail");
        assert!(matches!(err, DomainError::Unauthorized));
        assert!(
            repo.created_input
                .lock()
                .expect("created_input mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let service = BlogService::new(Arc::new(FakePostRepo::new()));

        let err = service
            .get_post(42, PostView::Minimal)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_post_embeds_comments_only_when_asked() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 10));
        *repo
            .comments_for_get
            .lock()
            .expect("comments_for_get mutex poisoned") = vec![sample_comment(1, 7), sample_comment(2, 7)];
        let service = BlogService::new(Arc::new(repo));

        let minimal = service
            .get_post(7, PostView::Minimal)
            .await
            .expect("post must exist");
        assert!(minimal.comments.is_none());

        let full = service
            .get_post(7, PostView::WithComments)
            .await
            .expect("post must exist");
        assert_eq!(full.comments.map(|comments| comments.len()), Some(2));
    }

    #[tokio::test]
    async fn update_post_uses_update_post_owned_contract() {
        let repo = FakePostRepo::with_post(sample_post(7, "old", 10));
        let service = BlogService::new(Arc::new(repo.clone()));

        let req = UpdatePostRequest {
            title: "  new  ".to_string(),
            content: "  body  ".to_string(),
            author_id: Some(10),
        };

        let updated = service
            .update_post(Actor::User(10), 7, req)
            .await
            .expect("update must succeed");
        assert_eq!(updated.id, 7);

        let call = repo
            .update_owned_call
            .lock()
            .expect("update_owned_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(call.0, 7);
        assert_eq!(call.1, 10);
        assert_eq!(call.2.title, "new");
        assert_eq!(call.2.content, "body");
    }

    #[tokio::test]
    async fn update_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 99));
        let service = BlogService::new(Arc::new(repo.clone()));

        let req = UpdatePostRequest {
            title: "new".to_string(),
            content: "body".to_string(),
            author_id: None,
        };

        let err = service
            .update_post(Actor::User(10), 7, req)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.update_owned_call
                .lock()
                .expect("update_owned_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn update_post_rejects_author_reassignment() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 10));
        let service = BlogService::new(Arc::new(repo));

        let req = UpdatePostRequest {
            title: "new".to_string(),
            content: "body".to_string(),
            author_id: Some(11),
        };

        let err = service
            .update_post(Actor::User(10), 7, req)
            .await
            .expect_err("reassignment must be rejected");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn update_post_checks_owner_before_payload() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 99));
        let service = BlogService::new(Arc::new(repo));

        let req = UpdatePostRequest {
            title: "   ".to_string(),
            content: String::new(),
            author_id: None,
        };

        let err = service
            .update_post(Actor::User(10), 7, req)
            .await
            .expect_err("non-owner must be rejected");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found_even_with_bad_payload() {
        let service = BlogService::new(Arc::new(FakePostRepo::new()));

        let req = UpdatePostRequest {
            title: String::new(),
            content: String::new(),
            author_id: None,
        };

        let err = service
            .update_post(Actor::User(10), 7, req)
            .await
            .expect_err("post is missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 99));
        let service = BlogService::new(Arc::new(repo.clone()));

        let err = service
            .delete_post(Actor::User(10), 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(!*repo.delete_called.lock().expect("delete_called mutex poisoned"));
    }

    #[tokio::test]
    async fn delete_post_by_anonymous_is_unauthorized() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 99));
        let service = BlogService::new(Arc::new(repo));

        let err = service
            .delete_post(Actor::Anonymous, 7)
            .await
            .expect_err("must be unauthorized");
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn delete_post_by_owner_succeeds() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", 10));
        let service = BlogService::new(Arc::new(repo.clone()));

        service
            .delete_post(Actor::User(10), 7)
            .await
            .expect("owner may delete");
        assert!(*repo.delete_called.lock().expect("delete_called mutex poisoned"));
    }

    #[tokio::test]
    async fn list_posts_picks_query_from_view() {
        let repo = FakePostRepo::new();
        *repo.list_result.lock().expect("list_result mutex poisoned") =
            vec![sample_post(1, "a", 10)];
        *repo
            .total_result
            .lock()
            .expect("total_result mutex poisoned") = 1;
        let service = BlogService::new(Arc::new(repo.clone()));
        let pagination = Pagination::new(Some(10), Some(0));

        let minimal = service
            .list_posts(PostFilter::default(), pagination, PostView::Minimal)
            .await
            .expect("list_posts must succeed");
        assert_eq!(minimal.total, 1);
        assert_eq!(minimal.pagination.limit, 10);
        assert!(minimal.posts[0].comments.is_none());

        let full = service
            .list_posts(PostFilter::default(), pagination, PostView::WithComments)
            .await
            .expect("list_posts must succeed");
        assert!(full.posts[0].comments.is_some());

        let calls = repo.list_calls.lock().expect("list_calls mutex poisoned").clone();
        assert_eq!(calls, vec!["list_all", "list_all_with_comments"]);
    }

    fn sample_post(id: i64, title: &str, author_id: i64) -> Post {
        Post::new(id, title.to_string(), "body".to_string(), author_id, Utc::now(), Utc::now())
            .expect("sample post must be valid")
    }

    fn sample_comment(id: i64, post_id: i64) -> Comment {
        let now = Utc::now();
        Comment::new(id, post_id, 10, "nice", now, now).expect("sample comment must be valid")
    }
}
