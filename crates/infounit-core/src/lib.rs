//! # infounit-core: Dual Unit-of-Measure Line Pricing
//!
//! This crate is the **heart** of Infounit. It lets a product be priced
//! and quantified in two units at once: the primary unit it is sold in,
//! and a secondary "informational" unit it is tracked in (sold per Unit,
//! tracked per Kilogram). All of it is pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Infounit Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host ERP Form Layer (external)                  │   │
//! │  │   renders fields ──► dispatches edits ──► persists records     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots in, field sets out           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ infounit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    uom    │  │conversion │  │   line    │  │   │
//! │  │   │  Product  │  │  rescale  │  │  engine   │  │controller │  │   │
//! │  │   │ PriceDigits│ │  rounding │  │ qty/price │  │transitions│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO RENDERING • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, PriceDigits, direction and kind)
//! - [`uom`] - Units of measure and rescaling primitives
//! - [`conversion`] - The conversion engine (methods on Product)
//! - [`line`] - Line snapshots and the reactive recompute handlers
//! - [`error`] - Domain error types
//! - [`validation`] - Host-input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every recompute is deterministic and idempotent
//! 2. **No I/O**: the host owns storage, rendering and dispatch
//! 3. **Decimal Everywhere**: quantities and prices are `rust_decimal`
//!    values, rounded at explicitly configured precisions
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use infounit_core::{DocumentDirection, Line, PriceDigits, Product, UnitOfMeasure};
//! use rust_decimal::Decimal;
//!
//! let product = Product {
//!     id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
//!     name: "Olive oil barrel".to_string(),
//!     uses_info_unit: true,
//!     info_unit: Some(UnitOfMeasure::kilogram()),
//!     info_ratio: Some(Decimal::TWO), // 1 barrel = 2 kg
//!     default_unit: UnitOfMeasure::unit(),
//!     list_price: Decimal::from(40),
//!     cost_price: Decimal::from(20),
//! };
//!
//! let mut line = Line::new(DocumentDirection::Customer);
//! line.product = Some(product);
//! line.unit = Some(UnitOfMeasure::unit());
//! line.product_changed(PriceDigits::default()).unwrap();
//!
//! line.unit_price = Some(Decimal::from(40));
//! line.unit_price_changed(PriceDigits::default()).unwrap();
//! assert_eq!(line.info_unit_price, Some(Decimal::from(20)));
//!
//! line.quantity = Decimal::from(5);
//! line.quantity_changed(PriceDigits::default()).unwrap();
//! assert_eq!(line.info_quantity, Some(Decimal::from(10)));
//! assert_eq!(line.amount(), Some(Decimal::from(200)));
//! ```

use rust_decimal::Decimal;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod conversion;
pub mod error;
pub mod line;
pub mod types;
pub mod uom;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use infounit_core::Line` instead of
// `use infounit_core::line::Line`

pub use error::{CoreError, CoreResult, ValidationError};
pub use line::{Line, LineField};
pub use types::{DocumentDirection, LineKind, PriceDigits, Product};
pub use uom::{UnitOfMeasure, UomCategory};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default fractional digits for informational prices.
///
/// The host's price configuration can override it per call through
/// [`PriceDigits`]; this is the value used when it doesn't.
pub const DEFAULT_PRICE_DIGITS: u32 = 4;

/// Display digits for informational quantities when no informational unit
/// is set on the line.
pub const DEFAULT_UNIT_DIGITS: u32 = 2;

/// Fractional digits of the document currency when the host supplies none.
pub const DEFAULT_CURRENCY_DIGITS: u32 = 2;

/// Rounding step for back-computed quantities when no target unit is
/// given: 0.0001, the finest step any seeded unit uses.
pub const FALLBACK_QUANTITY_STEP: Decimal = Decimal::from_parts(1, 0, 0, false, 4);
