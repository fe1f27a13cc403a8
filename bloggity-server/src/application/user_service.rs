use std::sync::Arc;

use tracing::info;

use crate::data::Pagination;
use crate::data::user_repository::{NewUser, UserPatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::policy::{self, Access, Actor};
use crate::domain::user::{RegisterRequest, UpdateUserRequest, User};
use crate::infrastructure::password::hash_password;

#[derive(Debug, Clone)]
pub(crate) struct ListUsersResult {
    pub(crate) users: Vec<User>,
    pub(crate) pagination: Pagination,
    pub(crate) total: i64,
}

pub(crate) struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub(crate) fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;
        let password_hash = hash_password(&req.password)?;

        let user = self
            .repo
            .create_user(NewUser {
                username: req.username,
                first_name: req.first_name,
                last_name: req.last_name,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user)
    }

    pub(crate) async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .get_user(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    pub(crate) async fn list_users(
        &self,
        pagination: Pagination,
    ) -> Result<ListUsersResult, DomainError> {
        let users = self.repo.list_users(pagination).await?;
        let total = self.repo.total_users().await?;
        Ok(ListUsersResult {
            users,
            pagination,
            total,
        })
    }

    pub(crate) async fn update_user(
        &self,
        actor: Actor,
        id: i64,
        req: UpdateUserRequest,
    ) -> Result<User, DomainError> {
        actor.require_user()?;
        let existing = self.get_user(id).await?;
        policy::user_instance_access(actor, Access::Update, existing.id).into_result()?;
        let req = req.validate()?;

        let password_hash = match req.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        self.repo
            .update_user(
                id,
                UserPatch {
                    username: req.username,
                    first_name: req.first_name,
                    last_name: req.last_name,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| user_not_found(id))
    }
}

fn user_not_found(id: i64) -> DomainError {
    DomainError::NotFound(format!("user id: {id}"))
}
