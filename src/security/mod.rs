//! Security Module
//!
//! Provides security features for the FinTwin API:
//! - Bearer token (JWT) issuance and validation
//! - Password hashing
//! - Request validation
//! - Security headers and auth extractors

pub mod auth;
pub mod middleware;
pub mod password;
pub mod validation;


pub use auth::{AuthToken, Claims, Credentials, JwtAuth, TokenType};
pub use middleware::{AuthUser, MaybeAuthUser, security_headers_middleware};
pub use password::{hash_password, verify_password};
pub use validation::{ValidationError, validators};
