//! Common types and utilities for the retail bank
//!
//! This library contains the shared types used by the bank service and its
//! front ends: the decimal money types, the unified error type, the customer
//! and account domain models with their business rules, and the notification
//! channel through which accounts report the outcome of each operation.

pub mod error;
pub mod model;
pub mod decimal;
pub mod notification;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use decimal::*;

pub use model::account::{Account, AccountKind, AccountType, EmployerDetails};
pub use model::customer::{Customer, NewCustomer};
pub use notification::{Notice, Notification, NotificationSink};
