//! Bank service for registering customers, opening accounts and moving money

pub mod service;
pub mod repository;
pub mod config;
pub mod shell;
pub mod demo;

pub use service::{BankService, MonthEndSummary, OpenAccount};
pub use repository::{BankRepository, InMemoryBankRepository};
pub use config::{BankConfig, NotificationMode};
