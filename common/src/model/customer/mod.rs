//! Customer model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::account::Account;

/// Registration request for a new customer
///
/// Phone number and email are optional and default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub customer_id: String,
    pub first_name: String,
    pub surname: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl NewCustomer {
    pub fn new(
        customer_id: impl Into<String>,
        first_name: impl Into<String>,
        surname: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            first_name: first_name.into(),
            surname: surname.into(),
            address: address.into(),
            phone_number: String::new(),
            email: String::new(),
        }
    }

    pub fn with_phone(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Customer model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer id
    pub customer_id: String,
    pub first_name: String,
    pub surname: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    /// Owned accounts in opening order
    accounts: Vec<Account>,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer with no accounts
    pub fn new(details: NewCustomer) -> Result<Self> {
        if details.customer_id.trim().is_empty() {
            return Err(Error::ValidationError("Customer id is required".to_string()));
        }

        Ok(Self {
            customer_id: details.customer_id,
            first_name: details.first_name,
            surname: details.surname,
            address: details.address,
            phone_number: details.phone_number,
            email: details.email,
            accounts: Vec::new(),
            registered_at: Utc::now(),
        })
    }

    /// First name and surname
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }

    /// Owned accounts in opening order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Find an owned account by number
    pub fn account(&self, account_number: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.account_number == account_number)
    }

    /// Find an owned account by number for mutation
    pub fn account_mut(&mut self, account_number: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.account_number == account_number)
    }

    /// Append an account. Duplicate detection is the caller's job.
    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Remove an account by number, returning it if it was owned
    pub fn remove_account(&mut self, account_number: &str) -> Option<Account> {
        let position = self.accounts.iter().position(|a| a.account_number == account_number)?;
        Some(self.accounts.remove(position))
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer{{ID='{}', Name='{}', Address='{}', Phone='{}', Email='{}', Accounts={}}}",
            self.customer_id,
            self.full_name(),
            self.address,
            self.phone_number,
            self.email,
            self.accounts.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::dec;

    fn customer() -> Customer {
        Customer::new(
            NewCustomer::new("C1", "Kabo", "Mosweu", "Plot 12, Gaborone")
                .with_phone("+267 71 000 000")
                .with_email("kabo@example.bw"),
        )
        .unwrap()
    }

    #[test]
    fn test_accounts_keep_opening_order() {
        let mut customer = customer();
        customer.add_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap());
        customer.add_account(Account::investment("INV001", dec!(500), "Gaborone", "C1").unwrap());
        customer.add_account(Account::savings("SAV002", dec!(0), "Maun", "C1").unwrap());

        let numbers: Vec<&str> = customer.accounts().iter().map(|a| a.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["SAV001", "INV001", "SAV002"]);
    }

    #[test]
    fn test_remove_account() {
        let mut customer = customer();
        customer.add_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap());
        customer.add_account(Account::savings("SAV002", dec!(200), "Gaborone", "C1").unwrap());

        let removed = customer.remove_account("SAV001").unwrap();
        assert_eq!(removed.balance(), dec!(100));
        assert_eq!(customer.accounts().len(), 1);
        assert!(customer.account("SAV001").is_none());

        assert!(customer.remove_account("SAV001").is_none());
    }

    #[test]
    fn test_blank_id_rejected() {
        let result = Customer::new(NewCustomer::new(" ", "Kabo", "Mosweu", "Gaborone"));
        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_display() {
        let mut customer = customer();
        customer.add_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap());
        assert_eq!(
            customer.to_string(),
            "Customer{ID='C1', Name='Kabo Mosweu', Address='Plot 12, Gaborone', \
             Phone='+267 71 000 000', Email='kabo@example.bw', Accounts=1}"
        );
    }
}
