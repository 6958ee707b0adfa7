//! 认证服务
//!
//! 用户注册、登录和令牌解析。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::user::{PublicUser, User};
use crate::security::auth::{AuthToken, JwtAuth};
use crate::security::password::{hash_password, verify_password};
use crate::security::validation::validators;
use crate::storage::repository::UserRepository;

const INVALID_CREDENTIALS: &str = "Incorrect username or password";

/// 注册参数
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 认证服务 trait
#[async_trait]
pub trait AuthService: Send + Sync {
    /// 注册新用户
    async fn register(&self, registration: Registration) -> Result<PublicUser>;

    /// 使用用户名或邮箱登录，返回访问令牌
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthToken>;

    /// 根据令牌主体（邮箱）获取当前用户
    async fn current_user(&self, email: &str) -> Result<PublicUser>;
}

/// 认证服务实现
pub struct AuthServiceImpl {
    users: Arc<dyn UserRepository>,
    jwt_auth: Arc<JwtAuth>,
}

impl AuthServiceImpl {
    pub fn new(users: Arc<dyn UserRepository>, jwt_auth: Arc<JwtAuth>) -> Self {
        Self { users, jwt_auth }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, registration: Registration) -> Result<PublicUser> {
        let username = registration.username.trim();
        let email = registration.email.trim();

        validators::validate_username(username)?;
        validators::validate_email(email)?;
        validators::validate_password(&registration.password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        // bcrypt 是 CPU 密集操作，放到阻塞线程池
        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))??;

        let user = self
            .users
            .create(&User::new(username, email, password_hash))
            .await?;

        info!("User created: {}", user.email);
        Ok(user.into())
    }

    async fn login(&self, identifier: &str, password: &str) -> Result<AuthToken> {
        debug!("Login attempt for: {}", identifier);

        let user = match self.users.find_by_username(identifier).await? {
            Some(user) => Some(user),
            None => {
                debug!("User not found by username, trying email");
                self.users.find_by_email(identifier).await?
            }
        };

        let Some(user) = user else {
            debug!("User not found");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        };

        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))??;

        if !matches {
            debug!("Password verification failed for {}", user.email);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        info!("Login successful: {}", user.email);
        self.jwt_auth.issue(&user)
    }

    async fn current_user(&self, email: &str) -> Result<PublicUser> {
        self.users
            .find_by_email(email)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::Authentication("User no longer exists".to_string()))
    }
}

/// 创建认证服务
pub fn create_auth_service(
    users: Arc<dyn UserRepository>,
    jwt_auth: Arc<JwtAuth>,
) -> Box<dyn AuthService> {
    Box::new(AuthServiceImpl::new(users, jwt_auth))
}
