//! # Validation Module
//!
//! Guards for values arriving from the host form layer, applied before a
//! recompute runs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host form widgets                                            │
//! │  ├── Basic format checks, immediate user feedback                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Non-numeric text rejected before any conversion                   │
//! │  ├── Negative quantity/price input rejected (credits negate            │
//! │  │   internally via Line::credit, never via user input)                │
//! │  └── Ratio and precision sanity                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Host storage constraints                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Input Parsing
// =============================================================================

fn parse_decimal(field: &str, text: &str) -> ValidationResult<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Decimal::from_str(text).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a number".to_string(),
    })
}

/// Parses a quantity entered in the form layer.
///
/// ## Rules
/// - Must be numeric text
/// - Must not be negative (zero is allowed: an empty line)
///
/// ## Example
/// ```rust
/// use infounit_core::validation::parse_quantity;
///
/// assert!(parse_quantity("5").is_ok());
/// assert!(parse_quantity("5,3").is_err());
/// assert!(parse_quantity("-1").is_err());
/// ```
pub fn parse_quantity(text: &str) -> ValidationResult<Decimal> {
    let qty = parse_decimal("quantity", text)?;
    if qty < Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(qty)
}

/// Parses a unit price entered in the form layer.
///
/// ## Rules
/// - Must be numeric text
/// - Must not be negative (zero is allowed: free items)
pub fn parse_price(text: &str) -> ValidationResult<Decimal> {
    let price = parse_decimal("price", text)?;
    if price < Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(price)
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates an informational ratio before it is stored on a product.
///
/// ## Rules
/// - Must be strictly positive; a zero ratio would make every
///   back-conversion divide by zero
pub fn validate_info_ratio(ratio: Decimal) -> ValidationResult<()> {
    if ratio <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "info_ratio".to_string(),
        });
    }
    Ok(())
}

/// Validates a price precision.
///
/// ## Rules
/// - Between 0 and 8 fractional digits
pub fn validate_price_digits(digits: u32) -> ValidationResult<()> {
    if digits > 8 {
        return Err(ValidationError::OutOfRange {
            field: "price_digits".to_string(),
            min: 0,
            max: 8,
        });
    }
    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a host-supplied record id.
///
/// ## Example
/// ```rust
/// use infounit_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }
    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
