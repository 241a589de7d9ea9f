//! # Validation Module
//!
//! Input checks the front end runs before it issues a ledger command.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front end                                                    │
//! │  ├── Keypad entry → parse_amount_entry()  (THIS MODULE)                │
//! │  └── Shows the error, keeps the keypad open                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: TripLedger                                                   │
//! │  └── Re-checks fare/amount > 0 and silently ignores violations         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Snapshot load                                                │
//! │  └── Schema validation of persisted records (snapshot module)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fare_core::validation::{parse_amount_entry, quick_payment_amounts};
//! use fare_core::Money;
//!
//! assert_eq!(parse_amount_entry("120").unwrap(), Money::from_units(120));
//! assert!(parse_amount_entry("123456").is_err());
//!
//! let buttons = quick_payment_amounts(Money::from_units(15));
//! assert_eq!(buttons[0], Money::from_units(15));
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ENTRY_DIGITS, QUICK_NOTE_AMOUNTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a trip fare.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_fare(fare: Money) -> ValidationResult<()> {
    if !fare.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "fare".to_string(),
        });
    }

    Ok(())
}

/// Validates an amount being added to a passenger's payment.
///
/// ## Rules
/// - Must be positive (> 0); there is no upper bound
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Keypad Entry
// =============================================================================

/// Parses a free-form keypad entry into an amount.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Digits only, at most [`MAX_ENTRY_DIGITS`]
/// - Must be positive ("0" and "000" are rejected)
///
/// ## User Workflow
/// ```text
/// Keypad: [1][2][0] OK
///      │
///      ▼
/// parse_amount_entry("120") ← THIS FUNCTION
///      │
///      ├── empty?        → Error: "amount is required"
///      ├── non-digit?    → Error: "amount has invalid format"
///      ├── > 5 digits?   → Error: "amount must be at most 5 characters"
///      ├── zero?         → Error: "amount must be positive"
///      │
///      └── OK(120) → update_passenger_payment(id, 120)
/// ```
pub fn parse_amount_entry(input: &str) -> ValidationResult<Money> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if input.len() > MAX_ENTRY_DIGITS {
        return Err(ValidationError::TooLong {
            field: "amount".to_string(),
            max: MAX_ENTRY_DIGITS,
        });
    }

    // At most five ASCII digits: always fits
    let value: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: "not a whole number".to_string(),
    })?;

    let amount = Money::from_units(value);
    validate_payment_amount(amount)?;
    Ok(amount)
}

/// The one-tap payment buttons for a passenger: the exact fare, then the
/// common banknotes.
pub fn quick_payment_amounts(fare: Money) -> [Money; 3] {
    [
        fare,
        Money::from_units(QUICK_NOTE_AMOUNTS[0]),
        Money::from_units(QUICK_NOTE_AMOUNTS[1]),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fare() {
        assert!(validate_fare(Money::from_units(15)).is_ok());
        assert!(validate_fare(Money::zero()).is_err());
        assert!(validate_fare(Money::from_units(-10)).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_units(1)).is_ok());
        assert!(validate_payment_amount(Money::from_units(100_000)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
    }

    #[test]
    fn test_parse_amount_entry() {
        assert_eq!(parse_amount_entry("50"), Ok(Money::from_units(50)));
        assert_eq!(parse_amount_entry(" 99999 "), Ok(Money::from_units(99_999)));
        assert_eq!(parse_amount_entry("007"), Ok(Money::from_units(7)));
    }

    #[test]
    fn test_parse_amount_entry_rejects() {
        assert!(matches!(
            parse_amount_entry(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_amount_entry("12a"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount_entry("-5"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount_entry("123456"),
            Err(ValidationError::TooLong { max: 5, .. })
        ));
        assert!(matches!(
            parse_amount_entry("000"),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_quick_payment_amounts() {
        let amounts = quick_payment_amounts(Money::from_units(20));
        assert_eq!(
            amounts.map(|m| m.units()),
            [20, 50, 100]
        );
    }
}
