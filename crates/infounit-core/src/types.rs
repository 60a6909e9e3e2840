//! # Domain Types
//!
//! Core domain types for dual unit-of-measure pricing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  PriceDigits    │   │ DocumentDirection│      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  default_unit   │   │  digits (u32)   │   │  Customer       │       │
//! │  │  info_unit      │   │  default = 4    │   │  Supplier       │       │
//! │  │  info_ratio     │   └─────────────────┘   └─────────────────┘       │
//! │  │  list/cost price│                                                   │
//! │  └─────────────────┘   ┌─────────────────┐                             │
//! │                        │    LineKind     │                             │
//! │   Line lives in        │  ─────────────  │                             │
//! │   line.rs              │  Line, Title,   │                             │
//! │                        │  Comment,       │                             │
//! │                        │  Subtotal       │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records are snapshots: the host resolves its ORM references and
//! hands the crate plain values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::uom::UnitOfMeasure;

// =============================================================================
// Price Digits
// =============================================================================

/// Price precision as a number of fractional digits.
///
/// Passed explicitly into every price conversion; there is no process-wide
/// precision setting anywhere in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceDigits(u32);

impl PriceDigits {
    /// Creates a precision from a digit count.
    #[inline]
    pub const fn new(digits: u32) -> Self {
        PriceDigits(digits)
    }

    /// Returns the digit count.
    #[inline]
    pub const fn digits(&self) -> u32 {
        self.0
    }
}

impl Default for PriceDigits {
    /// Four fractional digits, the informational price precision the host
    /// configures unless told otherwise.
    fn default() -> Self {
        PriceDigits(crate::DEFAULT_PRICE_DIGITS)
    }
}

// =============================================================================
// Document Direction
// =============================================================================

/// Which way the commercial document flows.
///
/// Outgoing documents (sales, customer invoices) price with selling
/// semantics; incoming documents (purchases, supplier invoices) with cost
/// semantics. The line controller selects by direction; the conversion
/// engine never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentDirection {
    /// Outgoing: sale order line, customer invoice line.
    Customer,
    /// Incoming: purchase line, supplier invoice line.
    Supplier,
}

impl Default for DocumentDirection {
    fn default() -> Self {
        DocumentDirection::Customer
    }
}

// =============================================================================
// Line Kind
// =============================================================================

/// What a document row represents.
///
/// Only billable rows carry quantities and prices; titles, comments and
/// subtotals pass through every recompute untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// A billable line item.
    Line,
    Title,
    Comment,
    Subtotal,
}

impl LineKind {
    /// Whether this row is a billable line item.
    #[inline]
    pub const fn is_line(&self) -> bool {
        matches!(self, LineKind::Line)
    }
}

impl Default for LineKind {
    fn default() -> Self {
        LineKind::Line
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as the host hands it to this crate.
///
/// `info_ratio` means: 1 `default_unit` of this product weighs/holds
/// `info_ratio` informational units. One ratio per product, shared by
/// every line referencing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Host identifier (UUID).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Whether this product carries a secondary informational unit.
    pub uses_info_unit: bool,

    /// The informational unit. Required when `uses_info_unit`.
    pub info_unit: Option<UnitOfMeasure>,

    /// Informational units per 1 `default_unit`. Required and positive
    /// when `uses_info_unit`.
    #[ts(as = "Option<String>")]
    pub info_ratio: Option<Decimal>,

    /// The product's native unit of measure.
    pub default_unit: UnitOfMeasure,

    /// Selling price per `default_unit`.
    #[ts(as = "String")]
    pub list_price: Decimal,

    /// Purchase cost per `default_unit`.
    #[ts(as = "String")]
    pub cost_price: Decimal,
}

// =============================================================================
// Unit Tests
// =============================================================================
