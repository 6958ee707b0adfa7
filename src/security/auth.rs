//! Authentication Module
//!
//! Bearer token issuance and validation (HS256 JWT).

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::error::{AppError, Result};
use crate::models::user::User;

/// Credentials for authentication
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    /// Bearer token (if provided)
    pub bearer_token: Option<String>,
}

impl Credentials {
    /// Try to extract credentials from Authorization header
    pub fn from_authorization_header(auth_header: Option<&str>) -> Self {
        let bearer_token = auth_header
            .and_then(|header| {
                header
                    .strip_prefix("Bearer ")
                    .or_else(|| header.strip_prefix("bearer "))
            })
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Self { bearer_token }
    }
}

/// Token type enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Bearer token (JWT)
    Bearer,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Bearer => write!(f, "bearer"),
        }
    }
}

/// Issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    /// The token string
    pub access_token: String,
    /// Type of token
    pub token_type: TokenType,
    /// Token expiration time
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Issued at timestamp
    pub iat: usize,
    /// Issuer
    pub iss: String,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Create new claims
    pub fn new(sub: &str, username: &str, expiry_seconds: u64, issuer: &str) -> Self {
        let now = Utc::now().timestamp() as usize;

        Self {
            sub: sub.to_string(),
            username: username.to_string(),
            exp: now + expiry_seconds as usize,
            iat: now,
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() as usize > self.exp
    }
}

/// JWT issuer and validator
#[derive(Clone)]
pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry_seconds: u64,
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuth")
            .field("issuer", &self.issuer)
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl JwtAuth {
    /// Create new JWT authenticator
    pub fn new(secret: &str, issuer: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            expiry_seconds,
        }
    }

    /// Create from security settings
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.jwt_issuer,
            config.jwt_expiry_seconds,
        )
    }

    /// Create a development JWT authenticator
    pub fn development() -> Self {
        Self::new("your_super_secret_key_change_this", "fintwin", 30 * 60)
    }

    /// Issue an access token for a user, subject is the user's email
    pub fn issue(&self, user: &User) -> Result<AuthToken> {
        let claims = Claims::new(&user.email, &user.username, self.expiry_seconds, &self.issuer);
        let expires_at = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .ok_or_else(|| AppError::Internal("token expiry out of range".to_string()))?;

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        Ok(AuthToken {
            access_token,
            token_type: TokenType::Bearer,
            expires_at,
        })
    }

    /// Validate a token and return claims
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }

    /// Validate bearer credentials
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Claims> {
        let token = credentials
            .bearer_token
            .as_deref()
            .ok_or_else(|| AppError::Authentication("No bearer token provided".to_string()))?;
        self.validate(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new("aarav", "aarav@example.com", "hash".to_string())
    }

    #[test]
    fn test_issue_and_validate() {
        let auth = JwtAuth::development();
        let token = auth.issue(&user()).unwrap();
        assert_eq!(token.token_type, TokenType::Bearer);
        assert!(!token.is_expired());

        let claims = auth.validate(&token.access_token).unwrap();
        assert_eq!(claims.sub, "aarav@example.com");
        assert_eq!(claims.username, "aarav");
        assert_eq!(claims.iss, "fintwin");
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtAuth::new("secret-one", "fintwin", 60).issue(&user()).unwrap();
        let err = JwtAuth::new("secret-two", "fintwin", 60)
            .validate(&token.access_token)
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = JwtAuth::new("secret", "someone-else", 60).issue(&user()).unwrap();
        assert!(JwtAuth::new("secret", "fintwin", 60).validate(&token.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = JwtAuth::development();
        let mut claims = Claims::new("aarav@example.com", "aarav", 0, "fintwin");
        claims.exp = (Utc::now().timestamp() - 3600) as usize;
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();
        assert!(claims.is_expired());
        assert!(auth.validate(&token).is_err());
    }

    #[test]
    fn test_credentials_from_header() {
        assert_eq!(
            Credentials::from_authorization_header(Some("Bearer abc.def")).bearer_token,
            Some("abc.def".to_string())
        );
        assert!(Credentials::from_authorization_header(Some("Basic xyz")).bearer_token.is_none());
        assert!(Credentials::from_authorization_header(Some("Bearer   ")).bearer_token.is_none());
        assert!(Credentials::from_authorization_header(None).bearer_token.is_none());
    }

    #[test]
    fn test_authenticate_requires_token() {
        let auth = JwtAuth::development();
        let err = auth
            .authenticate(&Credentials::from_authorization_header(None))
            .unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }
}
