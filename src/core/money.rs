use rust_decimal::Decimal;

use crate::core::{AppError, Result};

/// Ledger amounts are stored as DECIMAL(10, 2)
pub const SCALE: u32 = 2;

/// Label printed in front of formatted amounts
pub const CURRENCY_LABEL: &str = "Ksh.";

/// Largest amount a DECIMAL(10, 2) column can hold
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_99, SCALE)
}

/// Rounds a value to the ledger scale
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp(SCALE)
}

/// Validates that `amount` is non-negative, fits the column, and carries at
/// most two decimal places. `field` names the value in the error message.
pub fn validate_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::invalid_input(format!(
            "{} cannot be negative, got {}",
            field, amount
        )));
    }

    if amount.normalize().scale() > SCALE {
        return Err(AppError::invalid_input(format!(
            "{} must have at most {} decimal places, got {}",
            field, SCALE, amount
        )));
    }

    if amount > max_amount() {
        return Err(AppError::invalid_input(format!(
            "{} exceeds the maximum of {}",
            field,
            max_amount()
        )));
    }

    Ok(())
}

/// Same as [`validate_amount`] but zero is rejected too
pub fn validate_positive(field: &str, amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::invalid_input(format!(
            "{} must be greater than zero, got {}",
            field, amount
        )));
    }

    validate_amount(field, amount)
}

/// Formats an amount for display, e.g. `Ksh. 12500.00`
pub fn format_amount(amount: Decimal) -> String {
    format!("{} {:.2}", CURRENCY_LABEL, round(amount))
}
