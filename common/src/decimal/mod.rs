//! Decimal type utilities for precise money calculations

use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

/// Money amount (balances, deposits, withdrawals, interest)
pub type Amount = Decimal;

/// Interest rate expressed as a fraction (0.05 = 5%)
pub type Rate = Decimal;

/// Precision helpers for common operations
pub mod precision {
    use super::*;

    /// Display precision for money (2 decimal places)
    pub const MONEY_PRECISION: u32 = 2;

    /// Round an amount to display precision
    pub fn round_money(amount: Amount) -> Amount {
        amount.round_dp(MONEY_PRECISION)
    }

    /// Render an amount with exactly two decimal places
    pub fn format_money(amount: Amount) -> String {
        let mut rounded = round_money(amount);
        rounded.rescale(MONEY_PRECISION);
        rounded.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::precision::*;
    use super::*;

    #[test]
    fn test_format_money_pads_and_rounds() {
        assert_eq!(format_money(dec!(150)), "150.00");
        assert_eq!(format_money(dec!(0.4)), "0.40");
        assert_eq!(format_money(dec!(12.345)), "12.34");
        assert_eq!(format_money(dec!(12.355)), "12.36");
    }
}
