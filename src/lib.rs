//! Retail bank facade
//!
//! Re-exports the domain crate and the service crate so that front ends can
//! depend on a single package.

pub use bank_service;
pub use common;

pub use bank_service::{BankConfig, BankService, MonthEndSummary, OpenAccount};
pub use common::{Account, AccountKind, AccountType, Customer, Error, NewCustomer, Result};
