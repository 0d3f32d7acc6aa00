//! Demo dataset for trying the service out

use common::decimal::dec;
use common::error::Result;
use common::model::customer::NewCustomer;
use tracing::info;

use crate::service::{BankService, MonthEndSummary};

/// Register the demo customers and open one account of each variant
pub fn seed(service: &BankService) -> Result<()> {
    info!("Creating demo data...");

    service.register_customer(
        NewCustomer::new("C001", "Kabo", "Mosweu", "Plot 12, Gaborone")
            .with_phone("+267 71 234 567")
            .with_email("kabo.mosweu@example.bw"),
    )?;
    service.register_customer(
        NewCustomer::new("C002", "Naledi", "Kgosi", "Ward 4, Francistown").with_phone("+267 72 345 678"),
    )?;
    service.register_customer(NewCustomer::new("C003", "Thabo", "Dube", "Main Mall, Maun"))?;

    service.open_savings_account("SAV001", dec!(1000.00), "Gaborone", "C001")?;
    service.open_investment_account("INV001", dec!(5000.00), "Gaborone", "C001")?;
    service.open_cheque_account("CHQ001", dec!(2500.00), "Francistown", "C002", "Debswana", "Plot 1, Jwaneng")?;
    service.open_savings_account("SAV002", dec!(300.00), "Maun", "C003")?;

    Ok(())
}

/// Seed, run a few transactions and close the month
pub fn run(service: &BankService) -> Result<MonthEndSummary> {
    seed(service)?;

    service.deposit("SAV001", dec!(250.00))?;
    service.withdraw("CHQ001", dec!(400.00))?;
    service.withdraw("INV001", dec!(1000.00))?;

    // Exceeds the balance; shows the rejection path
    if let Err(e) = service.withdraw("SAV002", dec!(999.00)) {
        info!("Demo overdraft rejected: {}", e);
    }

    service.apply_monthly_interest_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::notification::NullSink;
    use std::sync::Arc;

    #[test]
    fn test_demo_run() {
        let service = BankService::with_notifier(Arc::new(NullSink));
        let summary = run(&service).unwrap();

        assert_eq!(summary.accounts, 4);
        // SAV001 1250 * 0.0005 + INV001 4000 * 0.05 + SAV002 300 * 0.0005
        assert_eq!(summary.total_interest, dec!(0.625) + dec!(200) + dec!(0.15));

        assert_eq!(service.get_balance("SAV001"), Some(dec!(1250.625)));
        assert_eq!(service.get_balance("CHQ001"), Some(dec!(2100)));
        assert_eq!(service.get_balance("INV001"), Some(dec!(4200)));
        assert_eq!(service.get_balance("SAV002"), Some(dec!(300.15)));
        assert_eq!(service.list_customers().unwrap().len(), 3);
    }
}
