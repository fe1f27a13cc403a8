use async_trait::async_trait;

use super::Pagination;
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct UserPatch {
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    /// `None` keeps the stored hash.
    pub(crate) password_hash: Option<String>,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str)
    -> Result<Option<UserCredentials>, DomainError>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DomainError>;
    async fn list_users(&self, pagination: Pagination) -> Result<Vec<User>, DomainError>;
    async fn total_users(&self) -> Result<i64, DomainError>;
}
