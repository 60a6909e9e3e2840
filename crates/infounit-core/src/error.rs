//! # Error Types
//!
//! Domain-specific error types for infounit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  infounit-core errors (this file)                                      │
//! │  ├── CoreError        - Configuration and conversion failures          │
//! │  └── ValidationError  - Host-input validation failures                 │
//! │                                                                         │
//! │  Host errors (outside this repo)                                       │
//! │  └── Form/storage errors - what the user ultimately sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → host form layer → user message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (unit names, field names)
//! 3. Errors are enum variants, never String
//! 4. A line without a product is NOT an error: recomputes no-op instead

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent configuration or conversion failures.
/// They block saving the offending record and must be shown to the user.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The informational unit is enabled but its configuration is unusable.
    ///
    /// ## When This Occurs
    /// - `uses_info_unit` is set without an informational unit
    /// - `info_ratio` is missing, zero, or negative
    ///
    /// Raised before any division by the ratio can happen.
    #[error("invalid information unit configuration for product {product}: {reason}")]
    InvalidConfiguration { product: String, reason: String },

    /// Rescaling was requested between units of different categories.
    ///
    /// ## When This Occurs
    /// - A line's unit belongs to another category than the product's
    ///   default unit (e.g. Gram quantity on a product sold per Liter)
    #[error("cannot rescale between {from} and {to}: incompatible unit categories")]
    IncompatibleUnits { from: String, to: String },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Host-input validation errors.
///
/// These errors occur when values arriving from the form layer don't meet
/// requirements. Used for early validation before a recompute runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (non-numeric text, malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
