//! Account models and related types
//!
//! An [`Account`] carries the state shared by every variant (number, owner,
//! branch, balance) and an [`AccountKind`] holding the variant's own fields.
//! Withdrawal and interest policy dispatch on the kind; deposit is shared.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{dec, precision::format_money, Amount, Rate};
use crate::error::{Error, Result};
use crate::notification::{Notice, Notification, NotificationSink};

/// Monthly interest rate paid on savings accounts (0.05%)
///
/// Product default chosen for this bank, not a published tariff.
pub const SAVINGS_MONTHLY_RATE: Rate = dec!(0.0005);

/// Monthly interest rate paid on investment accounts (5%)
pub const INVESTMENT_MONTHLY_RATE: Rate = dec!(0.05);

/// Smallest opening balance accepted for an investment account
pub const INVESTMENT_MINIMUM_BALANCE: Amount = dec!(500.00);

/// Account type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Cheque,
    Investment,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountType::Savings => "Savings",
            AccountType::Cheque => "Cheque",
            AccountType::Investment => "Investment",
        };
        f.write_str(name)
    }
}

/// Employer details carried by a cheque account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerDetails {
    /// Employer name
    pub employer_name: String,
    /// Employer (company) address
    pub company_address: String,
}

impl EmployerDetails {
    pub fn new(employer_name: impl Into<String>, company_address: impl Into<String>) -> Self {
        Self {
            employer_name: employer_name.into(),
            company_address: company_address.into(),
        }
    }
}

/// Account variant with its variant-specific fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Interest-bearing account with no opening minimum
    Savings,
    /// Salary account; earns no interest
    Cheque(EmployerDetails),
    /// High-interest account with an opening minimum
    Investment,
}

impl AccountKind {
    /// Type tag of this variant
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings => AccountType::Savings,
            AccountKind::Cheque(_) => AccountType::Cheque,
            AccountKind::Investment => AccountType::Investment,
        }
    }

    /// Monthly interest rate, if the variant earns interest
    pub fn monthly_rate(&self) -> Option<Rate> {
        match self {
            AccountKind::Savings => Some(SAVINGS_MONTHLY_RATE),
            AccountKind::Cheque(_) => None,
            AccountKind::Investment => Some(INVESTMENT_MONTHLY_RATE),
        }
    }

    /// Minimum balance required when the account is opened
    pub fn opening_minimum(&self) -> Amount {
        match self {
            AccountKind::Investment => INVESTMENT_MINIMUM_BALANCE,
            AccountKind::Savings | AccountKind::Cheque(_) => Amount::ZERO,
        }
    }
}

/// Account model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account number
    pub account_number: String,
    /// Id of the owning customer
    pub customer_id: String,
    /// Originating branch
    pub branch: String,
    /// Variant and its own fields
    pub kind: AccountKind,
    /// Current balance
    balance: Amount,
    /// Account opening timestamp
    pub opened_at: DateTime<Utc>,
    /// Last balance change timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Open an account of the given kind
    ///
    /// Fails when the account number or customer id is blank, when the
    /// initial balance is negative, or when it is below the kind's opening
    /// minimum.
    pub fn open(
        kind: AccountKind,
        account_number: impl Into<String>,
        initial_balance: Amount,
        branch: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<Self> {
        let account_number = account_number.into();
        let customer_id = customer_id.into();

        if account_number.trim().is_empty() {
            return Err(Error::ValidationError("Account number is required".to_string()));
        }
        if customer_id.trim().is_empty() {
            return Err(Error::ValidationError("Customer id is required".to_string()));
        }
        if initial_balance < Amount::ZERO {
            return Err(Error::InvalidAmount(format!(
                "Initial balance cannot be negative: {}",
                initial_balance
            )));
        }

        let minimum = kind.opening_minimum();
        if initial_balance < minimum {
            return Err(Error::MinimumBalance(format!(
                "Minimum balance must be {}",
                format_money(minimum)
            )));
        }

        let now = Utc::now();
        Ok(Self {
            account_number,
            customer_id,
            branch: branch.into(),
            kind,
            balance: initial_balance,
            opened_at: now,
            updated_at: now,
        })
    }

    /// Open a savings account
    pub fn savings(
        account_number: impl Into<String>,
        initial_balance: Amount,
        branch: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<Self> {
        Self::open(AccountKind::Savings, account_number, initial_balance, branch, customer_id)
    }

    /// Open a cheque account
    pub fn cheque(
        account_number: impl Into<String>,
        initial_balance: Amount,
        branch: impl Into<String>,
        customer_id: impl Into<String>,
        employer: EmployerDetails,
    ) -> Result<Self> {
        Self::open(AccountKind::Cheque(employer), account_number, initial_balance, branch, customer_id)
    }

    /// Open an investment account; fails below the opening minimum
    pub fn investment(
        account_number: impl Into<String>,
        initial_balance: Amount,
        branch: impl Into<String>,
        customer_id: impl Into<String>,
    ) -> Result<Self> {
        Self::open(AccountKind::Investment, account_number, initial_balance, branch, customer_id)
    }

    /// Current balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Type tag
    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    /// Employer details, for cheque accounts
    pub fn employer(&self) -> Option<&EmployerDetails> {
        match &self.kind {
            AccountKind::Cheque(employer) => Some(employer),
            _ => None,
        }
    }

    /// Add funds to the balance
    ///
    /// Rejects non-positive amounts and deposits that would overflow the
    /// balance; the balance is unchanged on rejection.
    pub fn deposit(&mut self, amount: Amount, sink: &dyn NotificationSink) -> Result<()> {
        if amount <= Amount::ZERO {
            self.notify(sink, Notice::InvalidDeposit(amount));
            return Err(Error::InvalidAmount(format!(
                "Deposit must be positive: {}",
                amount
            )));
        }

        let Some(balance) = self.balance.checked_add(amount) else {
            self.notify(sink, Notice::InvalidDeposit(amount));
            return Err(Error::InvalidAmount(format!(
                "Deposit of {} would overflow the balance of {}",
                amount, self.account_number
            )));
        };

        self.balance = balance;
        self.updated_at = Utc::now();
        self.notify(sink, Notice::Deposited(amount));
        Ok(())
    }

    /// Remove funds from the balance
    ///
    /// Every variant requires `0 < amount <= balance`. The investment opening
    /// minimum is not re-checked here.
    pub fn withdraw(&mut self, amount: Amount, sink: &dyn NotificationSink) -> Result<()> {
        if amount <= Amount::ZERO || amount > self.balance {
            self.notify(sink, Notice::InsufficientFunds(amount));
            return Err(Error::InsufficientFunds(format!(
                "Cannot withdraw {} from {} with balance {}",
                amount, self.account_number, self.balance
            )));
        }

        self.balance -= amount;
        self.updated_at = Utc::now();
        self.notify(sink, Notice::Withdrawn(amount));
        Ok(())
    }

    /// Credit one month of interest and return the amount credited
    ///
    /// Fails with `InvalidAmount`, leaving the balance unchanged, when the
    /// credited balance would not be representable.
    pub fn apply_monthly_interest(&mut self, sink: &dyn NotificationSink) -> Result<Amount> {
        let Some(rate) = self.kind.monthly_rate() else {
            self.notify(sink, Notice::NoInterest);
            return Ok(Amount::ZERO);
        };

        let credited = self
            .balance
            .checked_mul(rate)
            .and_then(|interest| Some((interest, self.balance.checked_add(interest)?)));
        let Some((interest, balance)) = credited else {
            self.notify(sink, Notice::InterestRejected);
            return Err(Error::InvalidAmount(format!(
                "Interest on {} would overflow balance {}",
                self.account_number, self.balance
            )));
        };

        self.balance = balance;
        self.updated_at = Utc::now();
        self.notify(sink, Notice::InterestApplied(interest));
        Ok(interest)
    }

    /// Human-readable summary
    pub fn describe(&self) -> String {
        self.to_string()
    }

    fn notify(&self, sink: &dyn NotificationSink, notice: Notice) {
        sink.notify(Notification::new(self.account_number.clone(), notice));
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account Number: {}, Type: {}, Balance: {}, Branch: {}",
            self.account_number,
            self.account_type(),
            format_money(self.balance),
            self.branch
        )?;
        if let Some(employer) = self.employer() {
            write!(f, " Employer: {}", employer.employer_name)?;
        }
        Ok(())
    }
}
