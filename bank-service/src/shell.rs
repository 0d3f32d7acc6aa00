//! Line-oriented command interpreter used by the `bank` binary

use common::decimal::{precision::format_money, Amount};
use common::error::{Error, Result};
use common::model::account::{AccountKind, EmployerDetails};
use common::model::customer::NewCustomer;

use crate::service::{BankService, OpenAccount};

pub const HELP: &str = "\
commands:
  customer <id> <first> <surname> <address> [phone] [email]
  open savings|investment <number> <amount> <branch> <customer>
  open cheque <number> <amount> <branch> <customer> <employer> <company-address>
  deposit <number> <amount>
  withdraw <number> <amount>
  balance <number>
  interest <number>
  month-end
  close <customer> <number>
  customers
  help
  quit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Customer(NewCustomer),
    Open(OpenAccount),
    Deposit { account_number: String, amount: Amount },
    Withdraw { account_number: String, amount: Amount },
    Balance { account_number: String },
    Interest { account_number: String },
    MonthEnd,
    Close { customer_id: String, account_number: String },
    Customers,
    Help,
    Quit,
}

/// Split a line on whitespace, keeping double-quoted runs together
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(Error::ValidationError("Unterminated quote".to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_amount(raw: &str) -> Result<Amount> {
    raw.parse::<Amount>()
        .map_err(|e| Error::InvalidAmount(format!("{}: {}", raw, e)))
}

fn expect_args(command: &str, args: &[String], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        return Err(Error::ValidationError(format!(
            "{} expects {} arguments, got {}",
            command,
            if min == max { min.to_string() } else { format!("{}-{}", min, max) },
            args.len()
        )));
    }
    Ok(())
}

impl Command {
    /// Parse one input line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let tokens = tokenize(trimmed)?;
        let (name, args) = match tokens.split_first() {
            Some((name, args)) => (name.to_ascii_lowercase(), args),
            None => return Ok(None),
        };

        let command = match name.as_str() {
            "customer" => {
                expect_args("customer", args, 4, 6)?;
                let mut details = NewCustomer::new(&args[0], &args[1], &args[2], &args[3]);
                if let Some(phone) = args.get(4) {
                    details = details.with_phone(phone);
                }
                if let Some(email) = args.get(5) {
                    details = details.with_email(email);
                }
                Command::Customer(details)
            }
            "open" => {
                let variant = args
                    .first()
                    .map(|v| v.to_ascii_lowercase())
                    .ok_or_else(|| Error::ValidationError("open expects an account type".to_string()))?;
                let kind = match variant.as_str() {
                    "savings" => {
                        expect_args("open savings", &args[1..], 4, 4)?;
                        AccountKind::Savings
                    }
                    "investment" => {
                        expect_args("open investment", &args[1..], 4, 4)?;
                        AccountKind::Investment
                    }
                    "cheque" => {
                        expect_args("open cheque", &args[1..], 6, 6)?;
                        AccountKind::Cheque(EmployerDetails::new(&args[5], &args[6]))
                    }
                    other => {
                        return Err(Error::ValidationError(format!("Unknown account type: {}", other)))
                    }
                };
                Command::Open(OpenAccount {
                    kind,
                    account_number: args[1].clone(),
                    initial_deposit: parse_amount(&args[2])?,
                    branch: args[3].clone(),
                    customer_id: args[4].clone(),
                })
            }
            "deposit" => {
                expect_args("deposit", args, 2, 2)?;
                Command::Deposit {
                    account_number: args[0].clone(),
                    amount: parse_amount(&args[1])?,
                }
            }
            "withdraw" => {
                expect_args("withdraw", args, 2, 2)?;
                Command::Withdraw {
                    account_number: args[0].clone(),
                    amount: parse_amount(&args[1])?,
                }
            }
            "balance" => {
                expect_args("balance", args, 1, 1)?;
                Command::Balance { account_number: args[0].clone() }
            }
            "interest" => {
                expect_args("interest", args, 1, 1)?;
                Command::Interest { account_number: args[0].clone() }
            }
            "month-end" => Command::MonthEnd,
            "close" => {
                expect_args("close", args, 2, 2)?;
                Command::Close {
                    customer_id: args[0].clone(),
                    account_number: args[1].clone(),
                }
            }
            "customers" => Command::Customers,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(Error::ValidationError(format!("Unknown command: {}", other))),
        };

        Ok(Some(command))
    }
}

/// Runs commands against a service and renders their results
pub struct Shell<'a> {
    service: &'a BankService,
    currency: String,
}

impl<'a> Shell<'a> {
    pub fn new(service: &'a BankService, currency: impl Into<String>) -> Self {
        Self {
            service,
            currency: currency.into(),
        }
    }

    fn money(&self, amount: Amount) -> String {
        format!("{} {}", self.currency, format_money(amount))
    }

    /// Execute a command and return the text to show the user
    pub fn execute(&self, command: Command) -> Result<String> {
        let output = match command {
            Command::Customer(details) => {
                let customer = self.service.register_customer(details)?;
                format!("Customer {} added", customer.customer_id)
            }
            Command::Open(request) => {
                let account = self.service.open_account(request)?;
                format!("{} account {} opened", account.account_type(), account.account_number)
            }
            Command::Deposit { account_number, amount } => {
                let balance = self.service.deposit(&account_number, amount)?;
                format!("Deposited {}; balance {}", self.money(amount), self.money(balance))
            }
            Command::Withdraw { account_number, amount } => {
                let balance = self.service.withdraw(&account_number, amount)?;
                format!("Withdrew {}; balance {}", self.money(amount), self.money(balance))
            }
            Command::Balance { account_number } => match self.service.get_balance(&account_number) {
                Some(balance) => format!("Balance: {}", self.money(balance)),
                None => {
                    return Err(Error::AccountNotFound(format!("Account not found: {}", account_number)))
                }
            },
            Command::Interest { account_number } => {
                let interest = self.service.apply_monthly_interest(&account_number)?;
                format!("Interest credited: {}", self.money(interest))
            }
            Command::MonthEnd => {
                let summary = self.service.apply_monthly_interest_all()?;
                format!(
                    "Month-end: {} accounts, {} interest",
                    summary.accounts,
                    self.money(summary.total_interest)
                )
            }
            Command::Close { customer_id, account_number } => {
                let account = self.service.remove_account(&customer_id, &account_number)?;
                format!("Closed {}; final balance {}", account.account_number, self.money(account.balance()))
            }
            Command::Customers => self.render_customers()?,
            Command::Help => HELP.to_string(),
            Command::Quit => "bye".to_string(),
        };
        Ok(output)
    }

    /// Customer listing with one indented line per account
    pub fn render_customers(&self) -> Result<String> {
        let customers = self.service.list_customers()?;
        if customers.is_empty() {
            return Ok("No customers".to_string());
        }

        let mut lines = Vec::new();
        for customer in &customers {
            lines.push(customer.to_string());
            for account in customer.accounts() {
                lines.push(format!("  {}", account));
            }
        }
        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::decimal::dec;
    use common::notification::NullSink;
    use std::sync::Arc;

    fn run(shell: &Shell<'_>, line: &str) -> Result<String> {
        let command = Command::parse(line)?.expect("command expected");
        shell.execute(command)
    }

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize(r#"customer C1 Kabo Mosweu "Plot 12, Gaborone""#).unwrap();
        assert_eq!(tokens, vec!["customer", "C1", "Kabo", "Mosweu", "Plot 12, Gaborone"]);

        assert_eq!(tokenize(r#"x """#).unwrap(), vec!["x", ""]);
        assert!(tokenize(r#"customer "open"#).is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# seed data").unwrap(), None);
        assert_eq!(
            Command::parse("withdraw SAV001 200.50").unwrap(),
            Some(Command::Withdraw { account_number: "SAV001".to_string(), amount: dec!(200.50) })
        );

        match Command::parse(r#"open cheque CHQ001 300 Gaborone C1 Debswana "Plot 1, Jwaneng""#).unwrap() {
            Some(Command::Open(request)) => {
                assert_eq!(request.account_number, "CHQ001");
                assert_eq!(request.customer_id, "C1");
                assert_eq!(
                    request.kind,
                    AccountKind::Cheque(EmployerDetails::new("Debswana", "Plot 1, Jwaneng"))
                );
            }
            other => panic!("Expected open command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("deposit SAV001"), Err(Error::ValidationError(_))));
        assert!(matches!(Command::parse("deposit SAV001 ten"), Err(Error::InvalidAmount(_))));
        assert!(matches!(Command::parse("open current X 1 B C1"), Err(Error::ValidationError(_))));
        assert!(matches!(Command::parse("transfer A B 1"), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_session() {
        let service = BankService::with_notifier(Arc::new(NullSink));
        let shell = Shell::new(&service, "BWP");

        run(&shell, r#"customer C1 Kabo Mosweu "Plot 12, Gaborone""#).unwrap();
        assert_eq!(
            run(&shell, "open savings SAV001 1000 Gaborone C1").unwrap(),
            "Savings account SAV001 opened"
        );
        assert_eq!(
            run(&shell, "withdraw SAV001 200").unwrap(),
            "Withdrew BWP 200.00; balance BWP 800.00"
        );
        assert!(matches!(run(&shell, "withdraw SAV001 900"), Err(Error::InsufficientFunds(_))));
        assert_eq!(run(&shell, "balance SAV001").unwrap(), "Balance: BWP 800.00");
        assert!(matches!(
            run(&shell, "open investment INV001 400 Gaborone C1"),
            Err(Error::MinimumBalance(_))
        ));
        assert!(matches!(run(&shell, "balance INV001"), Err(Error::AccountNotFound(_))));

        let listing = run(&shell, "customers").unwrap();
        assert!(listing.starts_with("Customer{ID='C1'"));
        assert!(listing.contains("  Account Number: SAV001, Type: Savings, Balance: 800.00, Branch: Gaborone"));
    }

    #[test]
    fn test_session_survives_overflow() {
        let service = BankService::with_notifier(Arc::new(NullSink));
        let shell = Shell::new(&service, "BWP");

        run(&shell, "customer C1 Kabo Mosweu Gaborone").unwrap();
        run(&shell, "open investment INV1 79228162514264337593543950335 Gaborone C1").unwrap();

        assert!(matches!(run(&shell, "interest INV1"), Err(Error::InvalidAmount(_))));
        assert!(matches!(run(&shell, "deposit INV1 1"), Err(Error::InvalidAmount(_))));
        // Still usable after the rejections
        assert!(run(&shell, "withdraw INV1 1").is_ok());
        assert_eq!(service.get_balance("INV1"), Some(Amount::MAX - dec!(1)));
    }
}
