//! Notification channel for account outcomes
//!
//! Every balance-affecting account operation, and every rejection of one,
//! hands exactly one [`Notification`] to a [`NotificationSink`]. The core does
//! not decide how notifications are shown; front ends pick a sink.

use std::fmt;

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::decimal::{precision::format_money, Amount};

/// Outcome reported by an account operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Funds credited by a deposit
    Deposited(Amount),
    /// Deposit rejected (non-positive amount)
    InvalidDeposit(Amount),
    /// Funds debited by a withdrawal
    Withdrawn(Amount),
    /// Withdrawal rejected
    InsufficientFunds(Amount),
    /// Monthly interest credited
    InterestApplied(Amount),
    /// Interest not credited because the balance would overflow
    InterestRejected,
    /// Account variant earns no interest
    NoInterest,
}

impl Notice {
    /// Whether this notice reports a rejected operation
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Notice::InvalidDeposit(_) | Notice::InsufficientFunds(_) | Notice::InterestRejected
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Deposited(amount) => write!(f, "Deposited: {}", format_money(*amount)),
            Notice::InvalidDeposit(_) => write!(f, "Invalid deposit amount"),
            Notice::Withdrawn(amount) => write!(f, "Withdrawn: {}", format_money(*amount)),
            Notice::InsufficientFunds(_) => write!(f, "Insufficient funds"),
            Notice::InterestApplied(amount) => write!(f, "Interest applied: {}", format_money(*amount)),
            Notice::InterestRejected => write!(f, "Interest could not be applied"),
            Notice::NoInterest => write!(f, "No interest on Cheque Account"),
        }
    }
}

/// A notice tagged with the account it concerns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Account the operation targeted
    pub account_number: String,
    /// What happened
    pub notice: Notice,
    /// When it happened
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification stamped with the current time
    pub fn new(account_number: impl Into<String>, notice: Notice) -> Self {
        Self {
            account_number: account_number.into(),
            notice,
            at: Utc::now(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.account_number, self.notice)
    }
}

/// Receiver of account notifications
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification
    fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        if notification.notice.is_warning() {
            warn!(account = %notification.account_number, "{}", notification.notice);
        } else {
            info!(account = %notification.account_number, "{}", notification.notice);
        }
    }
}

/// Sink that discards notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Sink that forwards notifications to a channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<Notification>,
}

impl ChannelSink {
    /// Create a sink together with the receiving end of its channel
    pub fn new() -> (Self, Receiver<Notification>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.sender.send(notification);
    }
}
