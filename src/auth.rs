// src/auth.rs
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub iat: i64, // Issued at timestamp
    pub exp: i64, // Expiration timestamp
}

pub struct AuthConfig {
    secret_key: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret_key: String, token_ttl_hours: i64) -> Self {
        Self {
            secret_key,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Sign a token for the given user
    pub fn create_token(&self, username: &str, is_admin: bool) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )
        .context("Failed to sign token")
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}

/// Any caller presenting a valid bearer token
pub struct AuthenticatedUser {
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.claims.username
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::NotConfigured)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match req.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) => token.trim(),
                None => {
                    warn!("Invalid Authorization header format");
                    return reject(req, AuthError::InvalidToken);
                }
            },
            None => return reject(req, AuthError::MissingToken),
        };

        match auth_config.verify_token(token) {
            Ok(claims) => Outcome::Success(AuthenticatedUser { claims }),
            Err(e) => {
                warn!("Token verification failed: {}", e);
                reject(req, AuthError::TokenVerificationFailed)
            }
        }
    }
}

/// Authenticated caller holding the admin role
pub struct AdminUser {
    pub user: AuthenticatedUser,
}

impl AdminUser {
    pub fn username(&self) -> &str {
        self.user.username()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(user) if user.is_admin() => Outcome::Success(AdminUser { user }),
            Outcome::Success(user) => {
                info!("User {} denied: admin role required", user.username());
                reject(req, AuthError::NotAuthorized)
            }
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

/// Reason for the last rejected guard, read back by the 401 catcher
pub struct AuthFailure(pub Option<&'static str>);

fn reject<T>(req: &Request<'_>, error: AuthError) -> Outcome<T, AuthError> {
    req.local_cache(|| AuthFailure(Some(error.message())));
    Outcome::Error((Status::Unauthorized, error))
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotAuthorized,
    NotConfigured,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotAuthorized => "Admin role required",
            AuthError::NotConfigured => "Authentication is not configured",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let auth_config = AuthConfig::new("test-secret".to_string(), 1);
        let token = auth_config.create_token("u2", true).unwrap();
        let claims = auth_config.verify_token(&token).unwrap();

        assert_eq!(claims.username, "u2");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = AuthConfig::new("one".to_string(), 1);
        let verifier = AuthConfig::new("two".to_string(), 1);
        let token = issuer.create_token("u1", false).unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth_config = AuthConfig::new("test-secret".to_string(), -2);
        let token = auth_config.create_token("u1", false).unwrap();

        assert!(auth_config.verify_token(&token).is_err());
    }
}
