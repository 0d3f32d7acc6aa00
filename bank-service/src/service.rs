//! Bank service implementation

use std::sync::Arc;

use common::decimal::Amount;
use common::error::{Error, ErrorExt, Result};
use common::model::account::{Account, AccountKind, EmployerDetails};
use common::model::customer::{Customer, NewCustomer};
use common::notification::{ChannelSink, LogSink, NotificationSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::repository::{BankRepository, InMemoryBankRepository};

/// Request to open an account of a given variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccount {
    pub kind: AccountKind,
    pub account_number: String,
    pub initial_deposit: Amount,
    pub branch: String,
    pub customer_id: String,
}

/// Outcome of a month-end interest run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthEndSummary {
    /// Accounts processed
    pub accounts: usize,
    /// Interest credited across all accounts
    pub total_interest: Amount,
}

/// Bank service mediating customer registration, account opening and
/// transactions
pub struct BankService {
    /// Repository for customer and account data
    repo: Arc<dyn BankRepository>,
    /// Receiver of account notifications
    notifier: Arc<dyn NotificationSink>,
}

impl BankService {
    /// Create a new bank service backed by memory, logging notifications
    pub fn new() -> Self {
        Self::with_notifier(Arc::new(LogSink))
    }

    /// Create a new in-memory bank service with a specific notification sink
    pub fn with_notifier(notifier: Arc<dyn NotificationSink>) -> Self {
        Self::with_repository(Arc::new(InMemoryBankRepository::new()), notifier)
    }

    /// Create a new bank service over an existing repository
    pub fn with_repository(repo: Arc<dyn BankRepository>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { repo, notifier }
    }

    /// Register a new customer
    pub fn register_customer(&self, details: NewCustomer) -> Result<Customer> {
        info!("Registering customer {}", details.customer_id);
        let customer = Customer::new(details)?;
        self.repo.insert_customer(customer)
    }

    /// Get a customer by id
    pub fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>> {
        self.repo.get_customer(customer_id)
    }

    /// Snapshot of every customer with their accounts
    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repo.list_customers()
    }

    /// Open an account for an existing customer
    pub fn open_account(&self, request: OpenAccount) -> Result<Account> {
        info!(
            "Opening {} account {} for customer {}",
            request.kind.account_type(),
            request.account_number,
            request.customer_id
        );

        if self.repo.get_customer(&request.customer_id)?.is_none() {
            return Err(Error::CustomerNotFound(format!(
                "Customer not found: {}",
                request.customer_id
            )));
        }
        if self.repo.account_exists(&request.account_number)? {
            return Err(Error::DuplicateAccount(format!(
                "Account number already in use: {}",
                request.account_number
            )));
        }

        let account = Account::open(
            request.kind,
            request.account_number,
            request.initial_deposit,
            request.branch,
            request.customer_id,
        )
        .map_err(|e| {
            warn!("Account opening rejected: {}", e);
            e
        })?;

        let account_number = account.account_number.clone();
        self.repo
            .insert_account(account)
            .with_context(|| format!("Failed to register account {}", account_number))
    }

    /// Open a savings account
    pub fn open_savings_account(
        &self,
        account_number: &str,
        initial_deposit: Amount,
        branch: &str,
        customer_id: &str,
    ) -> Result<Account> {
        self.open_account(OpenAccount {
            kind: AccountKind::Savings,
            account_number: account_number.to_string(),
            initial_deposit,
            branch: branch.to_string(),
            customer_id: customer_id.to_string(),
        })
    }

    /// Open an investment account; fails below the opening minimum
    pub fn open_investment_account(
        &self,
        account_number: &str,
        initial_deposit: Amount,
        branch: &str,
        customer_id: &str,
    ) -> Result<Account> {
        self.open_account(OpenAccount {
            kind: AccountKind::Investment,
            account_number: account_number.to_string(),
            initial_deposit,
            branch: branch.to_string(),
            customer_id: customer_id.to_string(),
        })
    }

    /// Open a cheque account
    pub fn open_cheque_account(
        &self,
        account_number: &str,
        initial_deposit: Amount,
        branch: &str,
        customer_id: &str,
        employer_name: &str,
        company_address: &str,
    ) -> Result<Account> {
        self.open_account(OpenAccount {
            kind: AccountKind::Cheque(EmployerDetails::new(employer_name, company_address)),
            account_number: account_number.to_string(),
            initial_deposit,
            branch: branch.to_string(),
            customer_id: customer_id.to_string(),
        })
    }

    /// Get an account by number
    pub fn get_account(&self, account_number: &str) -> Result<Option<Account>> {
        self.repo.get_account(account_number)
    }

    /// Current balance, or `None` for an unknown account number
    pub fn get_balance(&self, account_number: &str) -> Option<Amount> {
        match self.repo.get_account(account_number) {
            Ok(account) => account.map(|a| a.balance()),
            Err(e) => {
                warn!("Balance lookup for {} failed: {}", account_number, e);
                None
            }
        }
    }

    /// Deposit funds and return the new balance
    pub fn deposit(&self, account_number: &str, amount: Amount) -> Result<Amount> {
        info!("Depositing {} to account {}", amount, account_number);

        let account = self
            .transact(account_number, |account, sink| account.deposit(amount, sink))
            .with_context(|| format!("Deposit to {} failed", account_number))?;

        Ok(account.balance())
    }

    /// Withdraw funds and return the new balance
    pub fn withdraw(&self, account_number: &str, amount: Amount) -> Result<Amount> {
        info!("Withdrawing {} from account {}", amount, account_number);

        let account = self
            .transact(account_number, |account, sink| account.withdraw(amount, sink))
            .with_context(|| format!("Withdrawal from {} failed", account_number))?;

        Ok(account.balance())
    }

    /// Credit one month of interest to an account and return the interest
    pub fn apply_monthly_interest(&self, account_number: &str) -> Result<Amount> {
        let mut interest = Amount::ZERO;

        self.transact(account_number, |account, sink| {
            interest = account.apply_monthly_interest(sink)?;
            Ok(())
        })?;

        debug!("Credited {} interest to {}", interest, account_number);
        Ok(interest)
    }

    /// Run an account operation under the repository lock
    ///
    /// Notifications raised by the operation are held back and delivered
    /// after the lock is released, so a sink may call back into the service.
    fn transact<F>(&self, account_number: &str, mut operation: F) -> Result<Account>
    where
        F: FnMut(&mut Account, &dyn NotificationSink) -> Result<()>,
    {
        let (pending, outbox) = ChannelSink::new();
        let result = self
            .repo
            .update_account(account_number, &mut |account| operation(account, &pending));

        for notification in outbox.try_iter() {
            self.notifier.notify(notification);
        }
        result
    }

    /// Credit one month of interest to every account
    pub fn apply_monthly_interest_all(&self) -> Result<MonthEndSummary> {
        let mut summary = MonthEndSummary::default();

        for account_number in self.repo.account_numbers()? {
            match self.apply_monthly_interest(&account_number) {
                Ok(interest) => {
                    summary.accounts += 1;
                    summary.total_interest = summary.total_interest.saturating_add(interest);
                }
                // Closed between listing and crediting
                Err(Error::AccountNotFound(_)) => continue,
                Err(Error::InvalidAmount(msg)) => {
                    warn!("Skipping month-end interest: {}", msg);
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Month-end run credited {} interest across {} accounts",
            summary.total_interest, summary.accounts
        );
        Ok(summary)
    }

    /// Close an account held by a customer and return its final state
    pub fn remove_account(&self, customer_id: &str, account_number: &str) -> Result<Account> {
        info!("Removing account {} from customer {}", account_number, customer_id);
        self.repo.remove_account(customer_id, account_number)
    }
}

impl Default for BankService {
    fn default() -> Self {
        Self::new()
    }
}
