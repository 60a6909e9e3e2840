//! # Conversion Engine
//!
//! Bidirectional conversion between primary and informational quantities
//! and unit prices, implemented as pure methods on [`Product`].
//!
//! ## Conversion Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  R = info_ratio   U = default_unit   I = product info_unit             │
//! │                                                                         │
//! │  quantity_to_info:   qty ──rescale unit→U──► ×R ──► info_qty           │
//! │  info_to_quantity:   info_qty ──► ÷R ──rescale U→unit──► qty           │
//! │                                                                         │
//! │  price_to_info:      price ──rescale unit→U──► ÷R                      │
//! │                            ──info-unit factor──► info_price            │
//! │  info_price_to_unit: info_price ──info-unit factor──► ×R               │
//! │                            ──rescale U→unit──► price                   │
//! │                                                                         │
//! │  Every price result is rounded ONCE, at the end, to the configured     │
//! │  price digits. Intermediate math stays exact.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The informational-unit leg follows the *quantity* factor of the unit
//! change: a price of 20.0000 per Kilogram becomes 20000.0000 when the
//! line's informational unit switches to Gram. Both directions apply the
//! same factor, so the pair stays a round-trip inverse.
//!
//! When `uses_info_unit` is false, quantity conversions return zero and
//! price conversions return `Some(0)` for a present input, `None` for an
//! absent one.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, CoreResult};
use crate::types::{PriceDigits, Product};
use crate::uom::{round_to_step, UnitOfMeasure};
use crate::FALLBACK_QUANTITY_STEP;

/// Rounds a price to the configured number of fractional digits, half-up.
#[inline]
fn round_price(price: Decimal, digits: PriceDigits) -> Decimal {
    price.round_dp_with_strategy(digits.digits(), RoundingStrategy::MidpointAwayFromZero)
}

impl Product {
    // =========================================================================
    // Configuration Guard
    // =========================================================================

    /// Checks the informational-unit configuration.
    ///
    /// ## Rules
    /// - `uses_info_unit` off: nothing to check
    /// - `uses_info_unit` on: `info_unit` must be set, `info_ratio` must be
    ///   set and positive
    ///
    /// Every conversion calls this before dividing by the ratio, so a zero
    /// ratio surfaces as [`CoreError::InvalidConfiguration`] instead of a
    /// division by zero.
    pub fn ensure_info_config(&self) -> CoreResult<()> {
        if !self.uses_info_unit {
            return Ok(());
        }
        self.info_config().map(|_| ())
    }

    /// The validated informational unit and ratio.
    fn info_config(&self) -> CoreResult<(&UnitOfMeasure, Decimal)> {
        let invalid = |reason: &str| CoreError::InvalidConfiguration {
            product: self.id.clone(),
            reason: reason.to_string(),
        };
        let unit = self
            .info_unit
            .as_ref()
            .ok_or_else(|| invalid("info_unit is required when uses_info_unit is set"))?;
        let ratio = self
            .info_ratio
            .ok_or_else(|| invalid("info_ratio is required when uses_info_unit is set"))?;
        if ratio <= Decimal::ZERO {
            return Err(invalid("info_ratio must be positive"));
        }
        Ok((unit, ratio))
    }

    // =========================================================================
    // Quantity Conversion
    // =========================================================================

    /// Converts a primary quantity to the informational quantity.
    ///
    /// Rescales `qty` from `unit` to the product's default unit when they
    /// differ, then multiplies by the ratio. Zero in, zero out; zero when
    /// the product has no informational unit.
    pub fn quantity_to_info(
        &self,
        qty: Decimal,
        unit: Option<&UnitOfMeasure>,
    ) -> CoreResult<Decimal> {
        if !self.uses_info_unit || qty.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let (_, ratio) = self.info_config()?;

        let qty = match unit {
            Some(u) if *u != self.default_unit => u.compute_qty(qty, &self.default_unit, false)?,
            _ => qty,
        };
        Ok(ratio * qty)
    }

    /// Converts an informational quantity back to the primary quantity.
    ///
    /// Divides by the ratio to get a default-unit quantity, rescales to
    /// `unit` when given, and rounds to that unit's rounding step (or to
    /// the fixed 0.0001 step when no unit is supplied).
    pub fn info_to_quantity(
        &self,
        info_qty: Decimal,
        unit: Option<&UnitOfMeasure>,
    ) -> CoreResult<Decimal> {
        if !self.uses_info_unit || info_qty.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let (_, ratio) = self.info_config()?;

        let qty = info_qty / ratio;
        match unit {
            Some(u) => {
                let qty = if *u != self.default_unit {
                    self.default_unit.compute_qty(qty, u, false)?
                } else {
                    qty
                };
                Ok(u.round_qty(qty))
            }
            None => Ok(round_to_step(qty, FALLBACK_QUANTITY_STEP)),
        }
    }

    // =========================================================================
    // Price Conversion
    // =========================================================================

    /// Converts a primary unit price to the informational unit price.
    ///
    /// ## Steps
    /// 1. rescale `value` from per-`source_unit` to per-default-unit when
    ///    they differ (a price scales inversely to its quantity)
    /// 2. divide by the ratio, giving a price per product informational unit
    /// 3. when `info_unit` differs from the product's informational unit,
    ///    divide by the `info_unit` → product-info-unit quantity factor
    /// 4. round to `digits`
    ///
    /// `None` in, `None` out; `Some(0)` when the product has no
    /// informational unit.
    pub fn price_to_info(
        &self,
        value: Option<Decimal>,
        info_unit: Option<&UnitOfMeasure>,
        source_unit: Option<&UnitOfMeasure>,
        digits: PriceDigits,
    ) -> CoreResult<Option<Decimal>> {
        let Some(value) = value else {
            return Ok(None);
        };
        if !self.uses_info_unit {
            return Ok(Some(Decimal::ZERO));
        }
        let (product_info, ratio) = self.info_config()?;

        let price = match source_unit {
            Some(u) if *u != self.default_unit => u.compute_price(value, &self.default_unit)?,
            _ => value,
        };
        let mut price = price / ratio;

        if let Some(iu) = info_unit {
            if iu != product_info {
                price /= iu.factor_to(product_info)?;
            }
        }
        Ok(Some(round_price(price, digits)))
    }

    /// Converts an informational unit price back to the primary unit price.
    ///
    /// Exact inverse of [`Product::price_to_info`]: undo the informational
    /// unit factor, multiply by the ratio, rescale from per-default-unit to
    /// per-`target_unit`, round to `digits`.
    ///
    /// `None` in, `None` out; `Some(0)` when the product has no
    /// informational unit.
    pub fn info_price_to_unit(
        &self,
        info_price: Option<Decimal>,
        info_unit: Option<&UnitOfMeasure>,
        target_unit: Option<&UnitOfMeasure>,
        digits: PriceDigits,
    ) -> CoreResult<Option<Decimal>> {
        let Some(info_price) = info_price else {
            return Ok(None);
        };
        if !self.uses_info_unit {
            return Ok(Some(Decimal::ZERO));
        }
        let (product_info, ratio) = self.info_config()?;

        let mut price = info_price;
        if let Some(iu) = info_unit {
            if iu != product_info {
                price *= iu.factor_to(product_info)?;
            }
        }
        let mut price = price * ratio;
        if let Some(t) = target_unit {
            if *t != self.default_unit {
                price = self.default_unit.compute_price(price, t)?;
            }
        }
        Ok(Some(round_price(price, digits)))
    }

    // =========================================================================
    // Directional Wrappers
    // =========================================================================
    // Outgoing documents price with selling semantics, incoming with cost
    // semantics. The only asymmetry is the stored price a missing value
    // falls back to.

    /// Selling-side informational price: `value`, or the stored list price
    /// when no value is given.
    pub fn info_selling_price(
        &self,
        value: Option<Decimal>,
        info_unit: Option<&UnitOfMeasure>,
        source_unit: Option<&UnitOfMeasure>,
        digits: PriceDigits,
    ) -> CoreResult<Option<Decimal>> {
        let value = value.or(Some(self.list_price));
        self.price_to_info(value, info_unit, source_unit, digits)
    }

    /// Purchasing-side informational price: `value`, or the stored cost
    /// price when no value is given.
    pub fn info_purchase_price(
        &self,
        value: Option<Decimal>,
        info_unit: Option<&UnitOfMeasure>,
        source_unit: Option<&UnitOfMeasure>,
        digits: PriceDigits,
    ) -> CoreResult<Option<Decimal>> {
        let value = value.or(Some(self.cost_price));
        self.price_to_info(value, info_unit, source_unit, digits)
    }

    /// The stored list price expressed in the informational unit.
    pub fn list_price_to_info(&self, digits: PriceDigits) -> CoreResult<Option<Decimal>> {
        self.info_selling_price(None, None, None, digits)
    }

    /// The stored cost price expressed in the informational unit.
    pub fn cost_price_to_info(&self, digits: PriceDigits) -> CoreResult<Option<Decimal>> {
        self.info_purchase_price(None, None, None, digits)
    }

    // =========================================================================
    // Catalog Back-Computation
    // =========================================================================

    /// Sets the list price from an informational catalog price.
    ///
    /// Editing the informational list price on the product form
    /// back-computes the primary list price.
    pub fn set_list_price_from_info(
        &mut self,
        info_price: Decimal,
        digits: PriceDigits,
    ) -> CoreResult<()> {
        if let Some(price) = self.info_price_to_unit(Some(info_price), None, None, digits)? {
            self.list_price = price;
        }
        Ok(())
    }

    /// Sets the cost price from an informational catalog price.
    pub fn set_cost_price_from_info(
        &mut self,
        info_price: Decimal,
        digits: PriceDigits,
    ) -> CoreResult<()> {
        if let Some(price) = self.info_price_to_unit(Some(info_price), None, None, digits)? {
            self.cost_price = price;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uom::UnitOfMeasure;
    use rust_decimal_macros::dec;

    /// The product from the reference scenario: sold per Unit, tracked per
    /// Kilogram, 1 Unit = 2 kg, list 40, cost 20.
    fn product() -> Product {
        Product {
            id: "f3b5e8e0-0000-4000-8000-000000000001".to_string(),
            name: "product".to_string(),
            uses_info_unit: true,
            info_unit: Some(UnitOfMeasure::kilogram()),
            info_ratio: Some(dec!(2)),
            default_unit: UnitOfMeasure::unit(),
            list_price: dec!(40),
            cost_price: dec!(20),
        }
    }

    fn plain_product() -> Product {
        Product {
            uses_info_unit: false,
            info_unit: None,
            info_ratio: None,
            ..product()
        }
    }

    #[test]
    fn test_quantity_to_info() {
        let p = product();
        let unit = UnitOfMeasure::unit();

        assert_eq!(p.quantity_to_info(dec!(5), Some(&unit)).unwrap(), dec!(10));
        assert_eq!(p.quantity_to_info(dec!(0), Some(&unit)).unwrap(), dec!(0));
        assert_eq!(p.quantity_to_info(dec!(5), None).unwrap(), dec!(10));
    }

    #[test]
    fn test_quantity_to_info_rescales_line_unit() {
        // Sold per Kilogram, tracked per... anything: a Gram-denominated
        // line quantity is rescaled to Kilogram before the ratio applies.
        let p = Product {
            default_unit: UnitOfMeasure::kilogram(),
            ..product()
        };
        let g = UnitOfMeasure::gram();

        assert_eq!(p.quantity_to_info(dec!(500), Some(&g)).unwrap(), dec!(1));
    }

    #[test]
    fn test_info_to_quantity() {
        let p = product();
        let unit = UnitOfMeasure::unit();

        assert_eq!(p.info_to_quantity(dec!(10), Some(&unit)).unwrap(), dec!(5));
        assert_eq!(p.info_to_quantity(dec!(0), Some(&unit)).unwrap(), dec!(0));
        // No unit given: fixed 0.0001 rounding step
        assert_eq!(p.info_to_quantity(dec!(1), None).unwrap(), dec!(0.5));
    }

    #[test]
    fn test_quantity_round_trip() {
        let p = Product {
            default_unit: UnitOfMeasure::kilogram(),
            ..product()
        };
        let g = UnitOfMeasure::gram();

        for qty in [dec!(1), dec!(250), dec!(512.25), dec!(1000)] {
            let info = p.quantity_to_info(qty, Some(&g)).unwrap();
            let back = p.info_to_quantity(info, Some(&g)).unwrap();
            assert!((back - qty).abs() <= g.rounding, "{qty} came back as {back}");
        }
    }

    #[test]
    fn test_price_to_info() {
        let p = product();
        let unit = UnitOfMeasure::unit();
        let digits = PriceDigits::default();

        assert_eq!(
            p.price_to_info(Some(dec!(40)), None, Some(&unit), digits)
                .unwrap(),
            Some(dec!(20.0000))
        );
        assert_eq!(p.price_to_info(None, None, Some(&unit), digits).unwrap(), None);
    }

    #[test]
    fn test_price_to_info_follows_info_unit_quantity_factor() {
        let p = product();
        let g = UnitOfMeasure::gram();
        let digits = PriceDigits::default();

        // Informational unit switched Kilogram → Gram: the informational
        // price follows the quantity factor of the change.
        assert_eq!(
            p.price_to_info(Some(dec!(40)), Some(&g), None, digits).unwrap(),
            Some(dec!(20000.0000))
        );
    }

    #[test]
    fn test_info_price_to_unit() {
        let p = product();
        let digits = PriceDigits::default();

        assert_eq!(
            p.info_price_to_unit(Some(dec!(20)), None, None, digits).unwrap(),
            Some(dec!(40.0000))
        );
        assert_eq!(p.info_price_to_unit(None, None, None, digits).unwrap(), None);
    }

    #[test]
    fn test_price_round_trip() {
        let p = product();
        let g = UnitOfMeasure::gram();
        let unit = UnitOfMeasure::unit();
        let digits = PriceDigits::default();
        let tolerance = dec!(0.0001);

        for price in [dec!(40), dec!(19.99), dec!(0.07), dec!(123.4567)] {
            let info = p
                .price_to_info(Some(price), Some(&g), Some(&unit), digits)
                .unwrap();
            let back = p
                .info_price_to_unit(info, Some(&g), Some(&unit), digits)
                .unwrap()
                .unwrap();
            assert!((back - price).abs() <= tolerance, "{price} came back as {back}");
        }
    }

    #[test]
    fn test_catalog_prices() {
        let p = product();
        let digits = PriceDigits::default();

        assert_eq!(p.list_price_to_info(digits).unwrap(), Some(dec!(20.0000)));
        assert_eq!(p.cost_price_to_info(digits).unwrap(), Some(dec!(10.0000)));
    }

    #[test]
    fn test_catalog_back_computation() {
        let mut p = product();
        let digits = PriceDigits::default();

        p.set_list_price_from_info(dec!(25), digits).unwrap();
        assert_eq!(p.list_price, dec!(50.0000));

        p.set_cost_price_from_info(dec!(12.5), digits).unwrap();
        assert_eq!(p.cost_price, dec!(25.0000));
    }

    #[test]
    fn test_disabled_info_unit_returns_zero_or_absent() {
        let p = plain_product();
        let unit = UnitOfMeasure::unit();
        let digits = PriceDigits::default();

        assert_eq!(p.quantity_to_info(dec!(5), Some(&unit)).unwrap(), dec!(0));
        assert_eq!(p.info_to_quantity(dec!(10), Some(&unit)).unwrap(), dec!(0));
        assert_eq!(
            p.price_to_info(Some(dec!(40)), None, None, digits).unwrap(),
            Some(dec!(0))
        );
        assert_eq!(p.price_to_info(None, None, None, digits).unwrap(), None);
        assert_eq!(
            p.info_price_to_unit(Some(dec!(20)), None, None, digits).unwrap(),
            Some(dec!(0))
        );
        assert_eq!(p.info_price_to_unit(None, None, None, digits).unwrap(), None);
    }

    #[test]
    fn test_invalid_configuration() {
        let digits = PriceDigits::default();

        let zero_ratio = Product {
            info_ratio: Some(dec!(0)),
            ..product()
        };
        assert!(matches!(
            zero_ratio.ensure_info_config().unwrap_err(),
            CoreError::InvalidConfiguration { .. }
        ));
        assert!(zero_ratio.quantity_to_info(dec!(5), None).is_err());
        assert!(zero_ratio
            .price_to_info(Some(dec!(40)), None, None, digits)
            .is_err());

        let no_unit = Product {
            info_unit: None,
            ..product()
        };
        assert!(matches!(
            no_unit.ensure_info_config().unwrap_err(),
            CoreError::InvalidConfiguration { .. }
        ));

        let negative_ratio = Product {
            info_ratio: Some(dec!(-2)),
            ..product()
        };
        assert!(negative_ratio.info_to_quantity(dec!(10), None).is_err());
    }
}
