use std::sync::Arc;

use tracing::debug;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, User};
use crate::infrastructure::jwt::{Claims, JwtService, TokenType};
use crate::infrastructure::password::{DUMMY_PASSWORD_HASH, verify_password};

#[derive(Debug, Clone)]
pub(crate) struct TokenPair {
    pub(crate) user: User,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) struct AuthService {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub(crate) fn new(repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn obtain_tokens(&self, req: LoginRequest) -> Result<TokenPair, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // стремимся к одинаковому времени проверки если user не найден
                match verify_password(&req.password, DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        verify_password(&req.password, &user_creds.password_hash)?;

        let user = user_creds.user;
        let access_token = self.issue(&user, TokenType::Access)?;
        let refresh_token = self.issue(&user, TokenType::Refresh)?;

        Ok(TokenPair {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchanges a refresh token for a new access token. The subject must
    /// still exist.
    pub(crate) async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError> {
        let claims = self
            .jwt
            .verify_token_of_type(refresh_token, TokenType::Refresh)
            .map_err(|err| {
                debug!(error = %err, "refresh token rejected");
                DomainError::InvalidToken
            })?;

        let user = self
            .repo
            .get_user(claims.user_id)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        self.issue(&user, TokenType::Access)
    }

    pub(crate) fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        self.jwt.verify_token(token).map_err(|err| {
            debug!(error = %err, "token rejected");
            DomainError::InvalidToken
        })
    }

    fn issue(&self, user: &User, token_type: TokenType) -> Result<String, DomainError> {
        self.jwt
            .generate_token(user.id, &user.username, token_type)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
