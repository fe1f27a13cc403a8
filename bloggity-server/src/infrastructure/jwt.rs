use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("unexpected token type: expected {expected:?}, got {actual:?}")]
    WrongType {
        expected: TokenType,
        actual: TokenType,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TokenType {
    Access,
    Refresh,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) token_type: TokenType,
    pub(crate) exp: i64,
}

pub(crate) struct JwtService {
    secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_ACCESS_TTL_SECONDS: i64 = 60 * 60;
    const DEFAULT_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;

    pub(crate) fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        let access_ttl_seconds = if access_ttl_seconds > 0 {
            access_ttl_seconds
        } else {
            Self::DEFAULT_ACCESS_TTL_SECONDS
        };
        let refresh_ttl_seconds = if refresh_ttl_seconds > 0 {
            refresh_ttl_seconds
        } else {
            Self::DEFAULT_REFRESH_TTL_SECONDS
        };

        JwtService {
            secret: secret.into(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    pub(crate) fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        token_type: TokenType,
    ) -> Result<String, JwtError> {
        let ttl_seconds = match token_type {
            TokenType::Access => self.access_ttl_seconds,
            TokenType::Refresh => self.refresh_ttl_seconds,
        };
        let exp = (Utc::now() + Duration::seconds(ttl_seconds)).timestamp();

        let claims = Claims {
            user_id,
            username: username.into(),
            token_type,
            exp,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    /// Checks signature and expiry only; any token type passes.
    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }

    pub(crate) fn verify_token_of_type(
        &self,
        token: &str,
        expected: TokenType,
    ) -> Result<Claims, JwtError> {
        let claims = self.verify_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongType {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }
}
