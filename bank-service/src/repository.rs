//! Repository for customer and account data

use common::error::{Error, Result};
use common::model::account::Account;
use common::model::customer::Customer;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

/// Bank repository trait defining the interface for customer and account storage
pub trait BankRepository: Send + Sync {
    /// Store a new customer; fails if the id is taken
    fn insert_customer(&self, customer: Customer) -> Result<Customer>;

    /// Get a customer (with accounts) by id
    fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>>;

    /// Get all customers in registration order
    fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Whether an account number is already in use
    fn account_exists(&self, account_number: &str) -> Result<bool>;

    /// Attach a new account to its customer and index it by number
    fn insert_account(&self, account: Account) -> Result<Account>;

    /// Get an account by number
    fn get_account(&self, account_number: &str) -> Result<Option<Account>>;

    /// Run `update` against the stored account while holding its lock
    fn update_account(
        &self,
        account_number: &str,
        update: &mut dyn FnMut(&mut Account) -> Result<()>,
    ) -> Result<Account>;

    /// Every account number currently indexed
    fn account_numbers(&self) -> Result<Vec<String>>;

    /// Detach an account from its customer and drop it from the index
    fn remove_account(&self, customer_id: &str, account_number: &str) -> Result<Account>;
}

/// In-memory repository for customer and account data
///
/// Lock order is always `customers` before `account_index`.
pub struct InMemoryBankRepository {
    /// Customers by id, each owning its accounts
    pub customers: DashMap<String, Customer>,
    /// Owning customer id by account number
    pub account_index: DashMap<String, String>,
}

impl InMemoryBankRepository {
    /// Create a new in-memory bank repository
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            account_index: DashMap::new(),
        }
    }

    fn owner_of(&self, account_number: &str) -> Result<String> {
        // Clone out so the index guard is released before touching `customers`
        self.account_index
            .get(account_number)
            .map(|owner| owner.value().clone())
            .ok_or_else(|| Error::AccountNotFound(format!("Account not found: {}", account_number)))
    }
}

impl Default for InMemoryBankRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BankRepository for InMemoryBankRepository {
    fn insert_customer(&self, customer: Customer) -> Result<Customer> {
        match self.customers.entry(customer.customer_id.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateCustomer(format!(
                "Customer id already registered: {}",
                customer.customer_id
            ))),
            Entry::Vacant(slot) => {
                debug!("Storing customer {}", customer.customer_id);
                slot.insert(customer.clone());
                Ok(customer)
            }
        }
    }

    fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>> {
        Ok(self.customers.get(customer_id).map(|c| c.clone()))
    }

    fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut customers: Vec<Customer> = self.customers.iter().map(|entry| entry.value().clone()).collect();
        customers.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.customer_id.cmp(&b.customer_id))
        });
        Ok(customers)
    }

    fn account_exists(&self, account_number: &str) -> Result<bool> {
        Ok(self.account_index.contains_key(account_number))
    }

    fn insert_account(&self, account: Account) -> Result<Account> {
        let mut customer = self.customers.get_mut(&account.customer_id).ok_or_else(|| {
            Error::CustomerNotFound(format!("Customer not found: {}", account.customer_id))
        })?;

        match self.account_index.entry(account.account_number.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateAccount(format!(
                "Account number already in use: {}",
                account.account_number
            ))),
            Entry::Vacant(slot) => {
                debug!("Indexing account {} for customer {}", account.account_number, account.customer_id);
                slot.insert(account.customer_id.clone());
                customer.add_account(account.clone());
                Ok(account)
            }
        }
    }

    fn get_account(&self, account_number: &str) -> Result<Option<Account>> {
        let owner = match self.account_index.get(account_number) {
            Some(owner) => owner.value().clone(),
            None => return Ok(None),
        };

        Ok(self
            .customers
            .get(&owner)
            .and_then(|customer| customer.account(account_number).cloned()))
    }

    fn update_account(
        &self,
        account_number: &str,
        update: &mut dyn FnMut(&mut Account) -> Result<()>,
    ) -> Result<Account> {
        let owner = self.owner_of(account_number)?;

        let mut customer = self.customers.get_mut(&owner).ok_or_else(|| {
            Error::Internal(format!("Account {} indexed under missing customer {}", account_number, owner))
        })?;
        let account = customer.account_mut(account_number).ok_or_else(|| {
            Error::AccountNotFound(format!("Account not found: {}", account_number))
        })?;

        update(account)?;
        Ok(account.clone())
    }

    fn account_numbers(&self) -> Result<Vec<String>> {
        let mut numbers: Vec<String> = self.account_index.iter().map(|entry| entry.key().clone()).collect();
        numbers.sort();
        Ok(numbers)
    }

    fn remove_account(&self, customer_id: &str, account_number: &str) -> Result<Account> {
        let mut customer = self.customers.get_mut(customer_id).ok_or_else(|| {
            Error::CustomerNotFound(format!("Customer not found: {}", customer_id))
        })?;

        let account = customer.remove_account(account_number).ok_or_else(|| {
            Error::AccountNotFound(format!(
                "Account {} not held by customer {}",
                account_number, customer_id
            ))
        })?;
        self.account_index.remove(account_number);

        debug!("Removed account {} from customer {}", account_number, customer_id);
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::decimal::dec;
    use common::model::customer::NewCustomer;

    fn repo_with_customer(id: &str) -> InMemoryBankRepository {
        let repo = InMemoryBankRepository::new();
        let customer = Customer::new(NewCustomer::new(id, "Neo", "Dube", "Francistown")).unwrap();
        repo.insert_customer(customer).unwrap();
        repo
    }

    #[test]
    fn test_duplicate_customer_rejected() {
        let repo = repo_with_customer("C1");
        let again = Customer::new(NewCustomer::new("C1", "Other", "Person", "Maun")).unwrap();

        assert!(matches!(repo.insert_customer(again), Err(Error::DuplicateCustomer(_))));
        assert_eq!(repo.get_customer("C1").unwrap().unwrap().first_name, "Neo");
    }

    #[test]
    fn test_insert_account_indexes_by_number() {
        let repo = repo_with_customer("C1");
        repo.insert_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap()).unwrap();

        assert!(repo.account_exists("SAV001").unwrap());
        assert_eq!(repo.account_index.get("SAV001").unwrap().value(), "C1");
        assert_eq!(repo.get_customer("C1").unwrap().unwrap().accounts().len(), 1);
        assert_eq!(repo.get_account("SAV001").unwrap().unwrap().balance(), dec!(100));
    }

    #[test]
    fn test_insert_account_for_unknown_customer() {
        let repo = InMemoryBankRepository::new();
        let account = Account::savings("SAV001", dec!(100), "Gaborone", "C9").unwrap();

        assert!(matches!(repo.insert_account(account), Err(Error::CustomerNotFound(_))));
        assert!(repo.account_index.is_empty());
    }

    #[test]
    fn test_duplicate_account_number_across_customers() {
        let repo = repo_with_customer("C1");
        repo.insert_customer(Customer::new(NewCustomer::new("C2", "Mpho", "Kgosi", "Maun")).unwrap())
            .unwrap();
        repo.insert_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap()).unwrap();

        let clash = Account::savings("SAV001", dec!(5), "Maun", "C2").unwrap();
        assert!(matches!(repo.insert_account(clash), Err(Error::DuplicateAccount(_))));
        assert!(repo.get_customer("C2").unwrap().unwrap().accounts().is_empty());
    }

    #[test]
    fn test_update_account_failure_still_returns_error() {
        let repo = repo_with_customer("C1");
        repo.insert_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap()).unwrap();

        let result = repo.update_account("SAV001", &mut |_account| {
            Err(Error::InsufficientFunds("no".to_string()))
        });
        assert!(matches!(result, Err(Error::InsufficientFunds(_))));

        let missing = repo.update_account("SAV404", &mut |_account| Ok(()));
        assert!(matches!(missing, Err(Error::AccountNotFound(_))));
    }

    #[test]
    fn test_remove_account_keeps_index_consistent() {
        let repo = repo_with_customer("C1");
        repo.insert_account(Account::savings("SAV001", dec!(100), "Gaborone", "C1").unwrap()).unwrap();

        let removed = repo.remove_account("C1", "SAV001").unwrap();
        assert_eq!(removed.account_number, "SAV001");
        assert!(!repo.account_exists("SAV001").unwrap());
        assert!(repo.get_account("SAV001").unwrap().is_none());

        assert!(matches!(repo.remove_account("C1", "SAV001"), Err(Error::AccountNotFound(_))));
        assert!(matches!(repo.remove_account("C9", "SAV001"), Err(Error::CustomerNotFound(_))));
    }
}
