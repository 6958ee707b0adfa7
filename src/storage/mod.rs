//! 存储层模块
//!
//! 仓储 trait 及其内存实现。

pub mod memory;
pub mod repository;

pub use memory::{InMemoryTransactionRepository, InMemoryUserRepository};
pub use repository::{TransactionRepository, UserRepository};
