use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmBackend;
use crate::observability::AppMetrics;
use crate::security::auth::JwtAuth;
use crate::services::{
    AuthService, ChatService, TransactionService, create_auth_service, create_chat_service,
    create_transaction_service,
};
use crate::storage::memory::{InMemoryTransactionRepository, InMemoryUserRepository};
use crate::storage::repository::{TransactionRepository, UserRepository};

/// Application state containing all shared services and security components
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Token issuer and validator
    pub jwt_auth: Arc<JwtAuth>,
    /// User store, used by the auth extractors
    pub user_repository: Arc<dyn UserRepository>,
    /// Transaction store
    pub transaction_repository: Arc<dyn TransactionRepository>,
    pub auth_service: Arc<dyn AuthService>,
    pub chat_service: Arc<dyn ChatService>,
    pub transaction_service: Arc<dyn TransactionService>,
    /// Backend selected at startup
    pub llm_backend: LlmBackend,
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app_name", &self.config.app_name)
            .field("jwt_auth", &self.jwt_auth)
            .field("user_repository", &"Arc<dyn UserRepository>")
            .field("transaction_repository", &"Arc<dyn TransactionRepository>")
            .field("auth_service", &"Arc<dyn AuthService>")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("transaction_service", &"Arc<dyn TransactionService>")
            .field("llm_backend", &self.llm_backend)
            .finish()
    }
}

impl AppState {
    /// Wire services over the given stores
    pub fn new(
        config: AppConfig,
        llm_backend: LlmBackend,
        user_repository: Arc<dyn UserRepository>,
        transaction_repository: Arc<dyn TransactionRepository>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        let jwt_auth = Arc::new(JwtAuth::from_config(&config.security));
        let auth_service: Arc<dyn AuthService> =
            Arc::from(create_auth_service(user_repository.clone(), jwt_auth.clone()));
        let transaction_service: Arc<dyn TransactionService> =
            Arc::from(create_transaction_service(transaction_repository.clone()));
        let chat_service: Arc<dyn ChatService> = Arc::from(create_chat_service(
            llm_backend.clone(),
            transaction_service.clone(),
            metrics.clone(),
        ));

        Self {
            config: Arc::new(config),
            jwt_auth,
            user_repository,
            transaction_repository,
            auth_service,
            chat_service,
            transaction_service,
            llm_backend,
            metrics,
        }
    }

    /// Application state backed by in-memory stores
    pub fn in_memory(config: AppConfig, llm_backend: LlmBackend, metrics: Arc<AppMetrics>) -> Self {
        Self::new(
            config,
            llm_backend,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTransactionRepository::new()),
            metrics,
        )
    }
}
