//! # Unit of Measure Module
//!
//! Units of measure and the rescaling primitives the conversion engine is
//! built on.
//!
//! ## The Factor Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every unit stores a factor: base units of its category per 1 of it    │
//! │                                                                         │
//! │  Weight category (base: Kilogram)                                      │
//! │    Kilogram  factor = 1                                                │
//! │    Gram      factor = 0.001                                            │
//! │                                                                         │
//! │  Rescaling a quantity from A to B:   qty × A.factor / B.factor         │
//! │    500 Gram → Kilogram:  500 × 0.001 / 1 = 0.5                         │
//! │                                                                         │
//! │  Rescaling a unit price from A to B: price × B.factor / A.factor       │
//! │    20 $/Kilogram → $/Gram:  20 × 0.001 / 1 = 0.02                      │
//! │    (a price scales inversely to its quantity)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rescaling across categories is a [`CoreError::IncompatibleUnits`] error,
//! never a silent wrong number.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Unit Category
// =============================================================================

/// The physical dimension a unit measures.
///
/// Units can only be rescaled within their own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UomCategory {
    /// Countable pieces (the dimensionless category).
    Units,
    Weight,
    Length,
    Volume,
    Time,
}

// =============================================================================
// Unit of Measure
// =============================================================================

/// A unit of measure as the host framework defines it.
///
/// Carried inside product and line snapshots; this crate never looks units
/// up, the host supplies them fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UnitOfMeasure {
    /// Host identifier for the unit record.
    pub id: String,

    /// Display name ("Kilogram").
    pub name: String,

    /// Short symbol ("kg").
    pub symbol: String,

    /// Category the unit belongs to.
    pub category: UomCategory,

    /// Base units of the category per 1 of this unit.
    #[ts(as = "String")]
    pub factor: Decimal,

    /// Rounding step for quantities in this unit (e.g. 0.01).
    #[ts(as = "String")]
    pub rounding: Decimal,

    /// Display digits for quantities in this unit.
    pub digits: u32,
}

impl UnitOfMeasure {
    /// Creates a unit of measure.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        category: UomCategory,
        factor: Decimal,
        rounding: Decimal,
        digits: u32,
    ) -> Self {
        UnitOfMeasure {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            category,
            factor,
            rounding,
            digits,
        }
    }

    // -------------------------------------------------------------------------
    // Builtin units
    // -------------------------------------------------------------------------
    // The units the host seeds by default. Tests and host fixtures build on
    // these instead of re-declaring factors everywhere.

    /// The dimensionless "Unit" unit (1 piece).
    pub fn unit() -> Self {
        UnitOfMeasure::new(
            "unit",
            "Unit",
            "u",
            UomCategory::Units,
            Decimal::ONE,
            Decimal::ONE,
            0,
        )
    }

    /// Kilogram, the base unit of the Weight category.
    pub fn kilogram() -> Self {
        UnitOfMeasure::new(
            "kilogram",
            "Kilogram",
            "kg",
            UomCategory::Weight,
            Decimal::ONE,
            Decimal::new(1, 2),
            2,
        )
    }

    /// Gram: 1 Kilogram = 1000 Gram.
    pub fn gram() -> Self {
        UnitOfMeasure::new(
            "gram",
            "Gram",
            "g",
            UomCategory::Weight,
            Decimal::new(1, 3),
            Decimal::new(1, 2),
            2,
        )
    }

    // -------------------------------------------------------------------------
    // Rescaling primitives
    // -------------------------------------------------------------------------

    /// Quantity factor from this unit to `to`: how many `to` in 1 of `self`.
    ///
    /// ## Example
    /// ```rust
    /// use infounit_core::uom::UnitOfMeasure;
    /// use rust_decimal::Decimal;
    ///
    /// let kg = UnitOfMeasure::kilogram();
    /// let g = UnitOfMeasure::gram();
    /// assert_eq!(kg.factor_to(&g).unwrap(), Decimal::from(1000));
    /// ```
    pub fn factor_to(&self, to: &UnitOfMeasure) -> CoreResult<Decimal> {
        if self.category != to.category {
            return Err(CoreError::IncompatibleUnits {
                from: self.name.clone(),
                to: to.name.clone(),
            });
        }
        Ok(self.factor / to.factor)
    }

    /// Rescales a quantity from this unit to `to`.
    ///
    /// Identity when the units are equal. With `round` set, the result is
    /// rounded to the target unit's rounding step.
    ///
    /// ## Example
    /// ```rust
    /// use infounit_core::uom::UnitOfMeasure;
    /// use rust_decimal::Decimal;
    ///
    /// let kg = UnitOfMeasure::kilogram();
    /// let g = UnitOfMeasure::gram();
    /// let qty = kg.compute_qty(Decimal::new(5, 1), &g, true).unwrap();
    /// assert_eq!(qty, Decimal::from(500)); // 0.5 kg = 500 g
    /// ```
    pub fn compute_qty(&self, qty: Decimal, to: &UnitOfMeasure, round: bool) -> CoreResult<Decimal> {
        if self == to {
            return Ok(qty);
        }
        let rescaled = qty * self.factor_to(to)?;
        Ok(if round { to.round_qty(rescaled) } else { rescaled })
    }

    /// Rescales a unit price from per-`self` to per-`to`.
    ///
    /// A price scales inversely to its quantity: 20 per Kilogram is 0.02
    /// per Gram. Identity when the units are equal. No rounding here; the
    /// conversion engine rounds once, on its final result.
    pub fn compute_price(&self, price: Decimal, to: &UnitOfMeasure) -> CoreResult<Decimal> {
        if self == to {
            return Ok(price);
        }
        Ok(price / self.factor_to(to)?)
    }

    /// Rounds a quantity to this unit's rounding step (half-up).
    ///
    /// A zero or negative step leaves the quantity untouched.
    pub fn round_qty(&self, qty: Decimal) -> Decimal {
        round_to_step(qty, self.rounding)
    }
}

// =============================================================================
// Step Rounding
// =============================================================================

/// Rounds `value` to the nearest multiple of `step`, half away from zero.
///
/// ## Example
/// ```rust
/// use infounit_core::uom::round_to_step;
/// use rust_decimal::Decimal;
///
/// let step = Decimal::new(1, 2); // 0.01
/// assert_eq!(round_to_step(Decimal::new(12345, 3), step), Decimal::new(1235, 2));
/// ```
pub fn round_to_step(value: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return value;
    }
    let steps = (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    steps * step
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_factor_to() {
        let kg = UnitOfMeasure::kilogram();
        let g = UnitOfMeasure::gram();

        assert_eq!(kg.factor_to(&g).unwrap(), dec!(1000));
        assert_eq!(g.factor_to(&kg).unwrap(), dec!(0.001));
        assert_eq!(kg.factor_to(&kg).unwrap(), dec!(1));
    }

    #[test]
    fn test_factor_to_rejects_cross_category() {
        let unit = UnitOfMeasure::unit();
        let kg = UnitOfMeasure::kilogram();

        let err = unit.factor_to(&kg).unwrap_err();
        assert!(matches!(err, CoreError::IncompatibleUnits { .. }));
    }

    #[test]
    fn test_compute_qty() {
        let kg = UnitOfMeasure::kilogram();
        let g = UnitOfMeasure::gram();

        assert_eq!(kg.compute_qty(dec!(2), &g, true).unwrap(), dec!(2000));
        assert_eq!(g.compute_qty(dec!(500), &kg, true).unwrap(), dec!(0.5));
        // Identity does not touch the value
        assert_eq!(kg.compute_qty(dec!(2.345), &kg, true).unwrap(), dec!(2.345));
    }

    #[test]
    fn test_compute_qty_rounds_to_target_step() {
        let kg = UnitOfMeasure::kilogram();
        let g = UnitOfMeasure::gram();

        // 1.2345 g = 0.0012345 kg, rounded to kg's 0.01 step
        assert_eq!(g.compute_qty(dec!(1.2345), &kg, true).unwrap(), dec!(0));
        assert_eq!(
            g.compute_qty(dec!(1.2345), &kg, false).unwrap(),
            dec!(0.0012345)
        );
    }

    #[test]
    fn test_compute_price_scales_inversely() {
        let kg = UnitOfMeasure::kilogram();
        let g = UnitOfMeasure::gram();

        // 20 per kg = 0.02 per g
        assert_eq!(kg.compute_price(dec!(20), &g).unwrap(), dec!(0.02));
        // and back
        assert_eq!(g.compute_price(dec!(0.02), &kg).unwrap(), dec!(20));
    }

    #[test]
    fn test_round_to_step() {
        assert_eq!(round_to_step(dec!(5.555), dec!(0.01)), dec!(5.56));
        assert_eq!(round_to_step(dec!(5.554), dec!(0.01)), dec!(5.55));
        assert_eq!(round_to_step(dec!(5.4), dec!(1)), dec!(5));
        assert_eq!(round_to_step(dec!(5.5), dec!(1)), dec!(6));
        // Degenerate step leaves the value alone
        assert_eq!(round_to_step(dec!(5.555), dec!(0)), dec!(5.555));
    }

    #[test]
    fn test_builtin_units() {
        let unit = UnitOfMeasure::unit();
        assert_eq!(unit.category, UomCategory::Units);
        assert_eq!(unit.factor, dec!(1));

        let g = UnitOfMeasure::gram();
        assert_eq!(g.category, UomCategory::Weight);
        assert_eq!(g.factor, dec!(0.001));
    }
}
