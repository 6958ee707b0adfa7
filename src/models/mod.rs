//! 核心数据模型模块
//!
//! 用户与交易记录。

pub mod transaction;
pub mod user;

pub use transaction::Transaction;
pub use user::{PublicUser, User};
