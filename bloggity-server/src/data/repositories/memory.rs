use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::Pagination;
use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostFilter, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserPatch, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostEntry};
use crate::domain::user::User;

/// Shared in-memory tables with the same integrity rules as the schema:
/// unique usernames, foreign keys and cascading post deletes.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    users: Vec<UserCredentials>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn password_hash_of(&self, user_id: i64) -> Option<String> {
        self.lock()
            .users
            .iter()
            .find(|creds| creds.user.id == user_id)
            .map(|creds| creds.password_hash.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }
}

fn page<T: Clone>(items: &[T], pagination: Pagination) -> Vec<T> {
    items
        .iter()
        .skip(pagination.offset as usize)
        .take(pagination.limit as usize)
        .cloned()
        .collect()
}

fn filtered_posts(state: &State, filter: &PostFilter) -> Vec<Post> {
    let mut posts: Vec<Post> = state
        .posts
        .iter()
        .filter(|post| filter.title.as_deref().is_none_or(|title| post.title == title))
        .cloned()
        .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    posts
}

fn comments_of(state: &State, post_id: i64) -> Vec<Comment> {
    state
        .comments
        .iter()
        .filter(|comment| comment.post_id == post_id)
        .cloned()
        .collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|creds| creds.user.username == input.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let id = state.next_id();
        let user = User::new(
            id,
            input.username,
            input.first_name,
            input.last_name,
            Utc::now(),
        )?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|creds| creds.user.id == id)
            .map(|creds| creds.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|creds| creds.user.username == username)
            .cloned())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|creds| creds.user.id != id && creds.user.username == patch.username)
        {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let Some(creds) = state.users.iter_mut().find(|creds| creds.user.id == id) else {
            return Ok(None);
        };
        creds.user.username = patch.username;
        creds.user.first_name = patch.first_name;
        creds.user.last_name = patch.last_name;
        if let Some(password_hash) = patch.password_hash {
            creds.password_hash = password_hash;
        }
        Ok(Some(creds.user.clone()))
    }

    async fn list_users(&self, pagination: Pagination) -> Result<Vec<User>, DomainError> {
        let users: Vec<User> = self
            .lock()
            .users
            .iter()
            .map(|creds| creds.user.clone())
            .collect();
        Ok(page(&users, pagination))
    }

    async fn total_users(&self) -> Result<i64, DomainError> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        if !state.users.iter().any(|creds| creds.user.id == input.author_id) {
            return Err(DomainError::NotFound("author".to_string()));
        }

        let id = state.next_id();
        let now = Utc::now();
        let post = Post::new(id, input.title, input.content, input.author_id, now, now)?;
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        Ok(self.lock().posts.iter().find(|post| post.id == id).cloned())
    }

    async fn get_post_with_comments(&self, id: i64) -> Result<Option<PostEntry>, DomainError> {
        let state = self.lock();
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|post| PostEntry::with_comments(post.clone(), comments_of(&state, post.id))))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        let Some(post) = state
            .posts
            .iter_mut()
            .find(|post| post.id == post_id && post.author_id == owner_id)
        else {
            return Ok(None);
        };
        post.title = patch.title;
        post.content = patch.content;
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|post| post.id != id);
        let deleted = state.posts.len() < before;
        if deleted {
            state.comments.retain(|comment| comment.post_id != id);
        }
        Ok(deleted)
    }

    async fn list_all(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<Post>, DomainError> {
        let state = self.lock();
        Ok(page(&filtered_posts(&state, filter), pagination))
    }

    async fn list_all_with_comments(
        &self,
        filter: &PostFilter,
        pagination: Pagination,
    ) -> Result<Vec<PostEntry>, DomainError> {
        let state = self.lock();
        Ok(page(&filtered_posts(&state, filter), pagination)
            .into_iter()
            .map(|post| {
                let comments = comments_of(&state, post.id);
                PostEntry::with_comments(post, comments)
            })
            .collect())
    }

    async fn total_posts(&self, filter: &PostFilter) -> Result<i64, DomainError> {
        let state = self.lock();
        Ok(filtered_posts(&state, filter).len() as i64)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|post| post.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        if !state.users.iter().any(|creds| creds.user.id == input.author_id) {
            return Err(DomainError::NotFound("author".to_string()));
        }

        let id = state.next_id();
        let now = Utc::now();
        let comment = Comment::new(id, input.post_id, input.author_id, input.content, now, now)?;
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, post_id: i64, id: i64) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .lock()
            .comments
            .iter()
            .find(|comment| comment.id == id && comment.post_id == post_id)
            .cloned())
    }

    async fn update_comment_owned(
        &self,
        post_id: i64,
        id: i64,
        owner_id: i64,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        let Some(comment) = state.comments.iter_mut().find(|comment| {
            comment.id == id && comment.post_id == post_id && comment.author_id == owner_id
        }) else {
            return Ok(None);
        };
        comment.content = patch.content;
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, post_id: i64, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state
            .comments
            .retain(|comment| !(comment.id == id && comment.post_id == post_id));
        Ok(state.comments.len() < before)
    }

    async fn list_for_post(
        &self,
        post_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Comment>, DomainError> {
        let state = self.lock();
        Ok(page(&comments_of(&state, post_id), pagination))
    }

    async fn total_for_post(&self, post_id: i64) -> Result<i64, DomainError> {
        let state = self.lock();
        Ok(comments_of(&state, post_id).len() as i64)
    }
}
