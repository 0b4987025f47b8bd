//! Input checks shared by the write paths.

use crate::errors::{Error, Result};

/// Trims `name` and rejects it when nothing is left.
pub(crate) fn require_name(name: &str, what: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{what} name cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Accepts finite amounts that are zero or more.
pub(crate) fn require_non_negative_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Accepts finite amounts strictly above zero.
pub(crate) fn require_positive_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Accepts finite quantities strictly above zero.
pub(crate) fn require_positive_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

/// Accepts finite quantities that are zero or more.
pub(crate) fn require_non_negative_quantity(quantity: f64) -> Result<f64> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(Error::InvalidQuantity { quantity });
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_require_name_trims() {
        assert_eq!(require_name("  Flour ", "Ingredient").unwrap(), "Flour");
        assert!(matches!(
            require_name("   ", "Ingredient"),
            Err(Error::Validation { message: _ })
        ));
    }

    #[test]
    fn test_amount_checks() {
        assert_eq!(require_non_negative_amount(0.0).unwrap(), 0.0);
        assert!(require_non_negative_amount(-0.01).is_err());
        assert!(require_positive_amount(0.0).is_err());
        assert!(require_positive_amount(f64::NAN).is_err());
        assert!(require_positive_amount(f64::INFINITY).is_err());
        assert_eq!(require_positive_amount(2.5).unwrap(), 2.5);
    }

    #[test]
    fn test_quantity_checks() {
        assert!(matches!(
            require_positive_quantity(0.0),
            Err(Error::InvalidQuantity { quantity: _ })
        ));
        assert_eq!(require_non_negative_quantity(0.0).unwrap(), 0.0);
        assert!(require_non_negative_quantity(-1.0).is_err());
    }
}
