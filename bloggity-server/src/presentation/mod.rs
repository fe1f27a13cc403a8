use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::application::comment_service::CommentService;
use crate::application::user_service::UserService;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService>,
    pub(crate) user_service: Arc<UserService>,
    pub(crate) blog_service: Arc<BlogService>,
    pub(crate) comment_service: Arc<CommentService>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    /// Wires every service over the given repositories.
    pub(crate) fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt.clone())),
            user_service: Arc::new(UserService::new(users)),
            blog_service: Arc::new(BlogService::new(posts.clone())),
            comment_service: Arc::new(CommentService::new(posts, comments)),
            jwt,
        }
    }
}
