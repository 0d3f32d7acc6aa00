//! Configuration for the bank service

use std::env;
use std::str::FromStr;

use common::error::Error;

/// Where account notifications are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMode {
    /// Forward to the tracing subscriber
    Log,
    /// Discard
    None,
}

impl FromStr for NotificationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(NotificationMode::Log),
            "none" | "off" => Ok(NotificationMode::None),
            other => Err(Error::ConfigurationError(format!(
                "Unknown notification mode: {}",
                other
            ))),
        }
    }
}

/// Configuration for the bank service
#[derive(Debug, Clone)]
pub struct BankConfig {
    /// Name shown in front-end banners
    pub bank_name: String,
    /// Currency label used when displaying amounts
    pub currency: String,
    /// Log level for the service crates
    pub log_level: String,
    /// Notification delivery
    pub notifications: NotificationMode,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            bank_name: "Botswana Banking System".to_string(),
            currency: "BWP".to_string(),
            log_level: "info".to_string(),
            notifications: NotificationMode::Log,
        }
    }
}

impl BankConfig {
    /// Create a new configuration using environment variables
    ///
    /// Unset variables fall back to the defaults; an unparseable
    /// `BANK_NOTIFICATIONS` is an error.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = Self::default();

        let notifications = match env::var("BANK_NOTIFICATIONS") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.notifications,
        };

        Ok(Self {
            bank_name: env::var("BANK_NAME").unwrap_or(defaults.bank_name),
            currency: env::var("BANK_CURRENCY").unwrap_or(defaults.currency),
            log_level: env::var("BANK_LOG_LEVEL").unwrap_or(defaults.log_level),
            notifications,
        })
    }

    /// Create a new configuration with custom values
    pub fn new(
        bank_name: String,
        currency: String,
        log_level: String,
        notifications: NotificationMode,
    ) -> Self {
        Self {
            bank_name,
            currency,
            log_level,
            notifications,
        }
    }

    /// Tracing filter directive covering the bank crates
    pub fn log_filter(&self) -> String {
        format!("bank_service={level},bank={level},common={level}", level = self.log_level)
    }
}
