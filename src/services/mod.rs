//! 服务模块

pub mod auth;
pub mod chat;
pub mod transaction;

pub use auth::{AuthService, Registration, create_auth_service};
pub use chat::{ChatReply, ChatService, create_chat_service};
pub use transaction::{NewTransaction, TransactionPage, TransactionService, create_transaction_service};
