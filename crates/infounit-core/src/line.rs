//! # Line Module
//!
//! The document-line snapshot and the reactive recompute rules the host
//! form layer drives.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Edited field      │  Handler                │  Recomputed             │
//! │  ──────────────────┼─────────────────────────┼──────────────────────── │
//! │  product           │  product_changed        │  show_info_unit,        │
//! │                    │                         │  info_unit, then the    │
//! │                    │                         │  quantity + unit_price  │
//! │                    │                         │  cascades               │
//! │  quantity          │  quantity_changed       │  info_quantity          │
//! │  unit              │  unit_changed           │  info_unit_price,       │
//! │                    │                         │  info_quantity          │
//! │  unit_price        │  unit_price_changed     │  info_unit_price        │
//! │  info_quantity     │  info_quantity_changed  │  quantity, amount       │
//! │  info_unit_price   │  info_unit_price_changed│  unit_price, amount     │
//! │  info_unit         │  info_unit_changed      │  info_unit_price        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Primary-field edits only ever write `info_*` fields and `info_*` edits
//! only ever write primary fields: the dependency graph is bipartite and
//! acyclic, so no cascade can loop. Every handler is idempotent.
//!
//! A handler on a line with no product, or on a non-billable row (title,
//! comment, subtotal), is a silent no-op returning an empty field set.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::types::{DocumentDirection, LineKind, PriceDigits, Product};
use crate::uom::UnitOfMeasure;
use crate::{DEFAULT_CURRENCY_DIGITS, DEFAULT_UNIT_DIGITS};

// =============================================================================
// Line Field
// =============================================================================

/// A field the controller recomputed during a transition.
///
/// Returned to the host so it knows what to redisplay; `Amount` marks
/// that the host must re-run its own line-total computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Quantity,
    UnitPrice,
    ShowInfoUnit,
    InfoUnit,
    InfoQuantity,
    InfoUnitPrice,
    Amount,
}

// =============================================================================
// Line
// =============================================================================

/// An invoice or sale line as the host hands it to this crate.
///
/// Uses the snapshot pattern: the product is embedded by value, frozen at
/// edit time, never looked up. The host owns persistence and writes the
/// recomputed fields back to its own records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Line {
    /// Host identifier (UUID).
    pub id: String,

    /// What this row represents; only billable rows recompute.
    pub kind: LineKind,

    /// Direction of the parent document.
    pub direction: DocumentDirection,

    /// Product snapshot. `None` while the user has not picked one.
    pub product: Option<Product>,

    /// Primary quantity, denominated in `unit`.
    #[ts(as = "String")]
    pub quantity: Decimal,

    /// Primary unit of measure.
    pub unit: Option<UnitOfMeasure>,

    /// Primary unit price, per `unit`.
    #[ts(as = "Option<String>")]
    pub unit_price: Option<Decimal>,

    /// Derived: whether the informational fields are shown and required.
    pub show_info_unit: bool,

    /// Informational unit, derived from the product; the user may switch
    /// it to a compatible unit (e.g. Kilogram to Gram).
    pub info_unit: Option<UnitOfMeasure>,

    /// Informational quantity, denominated in `info_unit`.
    #[ts(as = "Option<String>")]
    pub info_quantity: Option<Decimal>,

    /// Informational unit price, per `info_unit`.
    #[ts(as = "Option<String>")]
    pub info_unit_price: Option<Decimal>,

    /// Fractional digits of the document currency.
    pub currency_digits: u32,
}

impl Line {
    /// Creates an empty billable line for a document direction.
    pub fn new(direction: DocumentDirection) -> Self {
        Line {
            id: Uuid::new_v4().to_string(),
            kind: LineKind::Line,
            direction,
            product: None,
            quantity: Decimal::ZERO,
            unit: None,
            unit_price: None,
            show_info_unit: false,
            info_unit: None,
            info_quantity: None,
            info_unit_price: None,
            currency_digits: DEFAULT_CURRENCY_DIGITS,
        }
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// The line total: quantity × unit price, rounded to the currency
    /// digits. Owned by the host; computed here so the host can display a
    /// consistent value right after a recompute.
    pub fn amount(&self) -> Option<Decimal> {
        if !self.kind.is_line() {
            return None;
        }
        self.unit_price.map(|price| {
            (self.quantity * price)
                .round_dp_with_strategy(self.currency_digits, RoundingStrategy::MidpointAwayFromZero)
        })
    }

    /// The informational total: info quantity × info unit price, rounded
    /// to the currency digits.
    pub fn info_amount(&self) -> Option<Decimal> {
        match (self.info_quantity, self.info_unit_price) {
            (Some(qty), Some(price)) => Some(
                (qty * price)
                    .round_dp_with_strategy(self.currency_digits, RoundingStrategy::MidpointAwayFromZero),
            ),
            _ => None,
        }
    }

    /// Display digits for the informational quantity.
    pub fn info_unit_digits(&self) -> u32 {
        self.info_unit
            .as_ref()
            .map(|unit| unit.digits)
            .unwrap_or(DEFAULT_UNIT_DIGITS)
    }

    // =========================================================================
    // Transition Handlers
    // =========================================================================

    /// The user picked (or cleared) the product.
    ///
    /// Re-derives `show_info_unit` and `info_unit`, then runs the
    /// quantity and unit-price cascades as if both had just been set.
    /// Clearing the product clears every derived informational field.
    pub fn product_changed(&mut self, digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        if !self.kind.is_line() {
            return Ok(Vec::new());
        }
        let Some(product) = self.product.clone() else {
            self.show_info_unit = false;
            self.info_unit = None;
            self.info_quantity = None;
            self.info_unit_price = None;
            debug!(line = %self.id, "Product cleared, informational fields reset");
            return Ok(vec![LineField::ShowInfoUnit, LineField::InfoUnit]);
        };

        product.ensure_info_config()?;
        self.show_info_unit = product.uses_info_unit;
        self.info_unit = product.info_unit.clone();
        debug!(
            line = %self.id,
            product = %product.id,
            show_info_unit = self.show_info_unit,
            "Product changed, informational unit rederived"
        );

        let mut fields = vec![LineField::ShowInfoUnit, LineField::InfoUnit];
        fields.extend(self.quantity_changed(digits)?);
        fields.extend(self.unit_price_changed(digits)?);
        Ok(fields)
    }

    /// The user edited the primary quantity.
    ///
    /// An empty (zero) quantity leaves the informational quantity empty
    /// rather than writing a zero the required-field gate would accept.
    pub fn quantity_changed(&mut self, _digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        self.recompute_info_quantity(&product)?;
        debug!(
            line = %self.id,
            qty = %self.quantity,
            info_qty = ?self.info_quantity,
            "Quantity recomputed"
        );
        Ok(vec![LineField::InfoQuantity])
    }

    /// The user switched the primary unit of measure.
    pub fn unit_changed(&mut self, digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        self.info_unit_price = self.info_price_for_direction(&product, digits)?;
        self.recompute_info_quantity(&product)?;
        debug!(
            line = %self.id,
            unit = self.unit.as_ref().map(|u| u.name.as_str()).unwrap_or("-"),
            "Unit switched, informational fields recomputed"
        );
        Ok(vec![LineField::InfoUnitPrice, LineField::InfoQuantity])
    }

    /// The user edited the primary unit price.
    pub fn unit_price_changed(&mut self, digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        self.info_unit_price = self.info_price_for_direction(&product, digits)?;
        debug!(
            line = %self.id,
            unit_price = ?self.unit_price,
            "Unit price recomputed into informational price"
        );
        Ok(vec![LineField::InfoUnitPrice])
    }

    /// The user edited the informational quantity.
    ///
    /// Back-computes the primary quantity; the line amount follows.
    pub fn info_quantity_changed(&mut self, _digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        let qty =
            product.info_to_quantity(self.info_quantity.unwrap_or_default(), self.unit.as_ref())?;
        self.quantity = qty;
        debug!(line = %self.id, qty = %qty, "Quantity back-computed from informational quantity");
        Ok(vec![LineField::Quantity, LineField::Amount])
    }

    /// The user edited the informational unit price.
    ///
    /// Back-computes the primary unit price; the line amount follows.
    pub fn info_unit_price_changed(&mut self, digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        if self.info_unit_price.is_none() {
            return Ok(Vec::new());
        }
        self.unit_price = product.info_price_to_unit(
            self.info_unit_price,
            self.info_unit.as_ref(),
            self.unit.as_ref(),
            digits,
        )?;
        debug!(
            line = %self.id,
            unit_price = ?self.unit_price,
            "Unit price back-computed from informational price"
        );
        Ok(vec![LineField::UnitPrice, LineField::Amount])
    }

    /// The user switched the informational unit (e.g. Kilogram to Gram).
    ///
    /// Rescales the informational unit price into the new unit; the
    /// primary price and the amount stay untouched.
    pub fn info_unit_changed(&mut self, digits: PriceDigits) -> CoreResult<Vec<LineField>> {
        let Some(product) = self.billable_product() else {
            return Ok(Vec::new());
        };
        self.info_unit_price = self.info_price_for_direction(&product, digits)?;
        debug!(
            line = %self.id,
            info_unit = self.info_unit.as_ref().map(|u| u.name.as_str()).unwrap_or("-"),
            "Informational unit switched, informational price rescaled"
        );
        Ok(vec![LineField::InfoUnitPrice])
    }

    // =========================================================================
    // Derivations and Checks
    // =========================================================================

    /// Duplicates the line as a credit.
    ///
    /// Quantities negate; unit prices carry over unchanged (a credit does
    /// not reprice anything).
    pub fn credit(&self) -> Line {
        let mut credit = self.clone();
        credit.id = Uuid::new_v4().to_string();
        credit.quantity = -self.quantity;
        credit.info_quantity = self.info_quantity.map(|qty| -qty);
        credit
    }

    /// Derives an invoice line from this sale line.
    ///
    /// Copies the commercial fields and re-runs the unit cascade so the
    /// informational fields are consistent on the generated document.
    pub fn to_invoice_line(&self, digits: PriceDigits) -> CoreResult<Line> {
        let mut line = self.clone();
        line.id = Uuid::new_v4().to_string();
        line.unit_changed(digits)?;
        Ok(line)
    }

    /// Checks the line may be finalized.
    ///
    /// When the informational unit is shown on a billable line, both
    /// informational fields are required.
    pub fn validate_finalize(&self) -> CoreResult<()> {
        if !(self.kind.is_line() && self.show_info_unit) {
            return Ok(());
        }
        if self.info_quantity.is_none() {
            return Err(ValidationError::Required {
                field: "info_quantity".to_string(),
            }
            .into());
        }
        if self.info_unit_price.is_none() {
            return Err(ValidationError::Required {
                field: "info_unit_price".to_string(),
            }
            .into());
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The product snapshot, when this row is billable and has one.
    fn billable_product(&self) -> Option<Product> {
        if !self.kind.is_line() {
            return None;
        }
        self.product.clone()
    }

    /// Writes the informational quantity for the current primary quantity.
    /// Empty quantities stay empty instead of becoming a stored zero.
    fn recompute_info_quantity(&mut self, product: &Product) -> CoreResult<()> {
        self.info_quantity = if self.quantity.is_zero() {
            None
        } else {
            Some(product.quantity_to_info(self.quantity, self.unit.as_ref())?)
        };
        Ok(())
    }

    /// The informational price for the current primary price, selected by
    /// document direction: selling semantics on customer documents, cost
    /// semantics on supplier documents. `None` when no primary price is
    /// set (lines never fall back to catalog prices).
    fn info_price_for_direction(
        &self,
        product: &Product,
        digits: PriceDigits,
    ) -> CoreResult<Option<Decimal>> {
        if self.unit_price.is_none() {
            return Ok(None);
        }
        match self.direction {
            DocumentDirection::Customer => product.info_selling_price(
                self.unit_price,
                self.info_unit.as_ref(),
                self.unit.as_ref(),
                digits,
            ),
            DocumentDirection::Supplier => product.info_purchase_price(
                self.unit_price,
                self.info_unit.as_ref(),
                self.unit.as_ref(),
                digits,
            ),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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

    fn line() -> Line {
        let mut line = Line::new(DocumentDirection::Customer);
        line.product = Some(product());
        line.unit = Some(UnitOfMeasure::unit());
        line.product_changed(PriceDigits::default()).unwrap();
        line
    }

    #[test]
    fn test_product_changed_derives_visibility() {
        let line = line();
        assert!(line.show_info_unit);
        assert_eq!(line.info_unit, Some(UnitOfMeasure::kilogram()));
    }

    #[test]
    fn test_product_cleared_resets_informational_fields() {
        let mut line = line();
        line.quantity = dec!(5);
        line.quantity_changed(PriceDigits::default()).unwrap();

        line.product = None;
        let fields = line.product_changed(PriceDigits::default()).unwrap();
        assert_eq!(fields, vec![LineField::ShowInfoUnit, LineField::InfoUnit]);
        assert!(!line.show_info_unit);
        assert_eq!(line.info_unit, None);
        assert_eq!(line.info_quantity, None);
        assert_eq!(line.info_unit_price, None);
    }

    #[test]
    fn test_quantity_edit_recomputes_info_quantity() {
        let mut line = line();
        line.quantity = dec!(5);
        let fields = line.quantity_changed(PriceDigits::default()).unwrap();

        assert_eq!(fields, vec![LineField::InfoQuantity]);
        assert_eq!(line.info_quantity, Some(dec!(10)));
    }

    #[test]
    fn test_unit_price_edit_customer_uses_selling_semantics() {
        let mut line = line();
        line.unit_price = Some(dec!(40));
        let fields = line.unit_price_changed(PriceDigits::default()).unwrap();

        assert_eq!(fields, vec![LineField::InfoUnitPrice]);
        assert_eq!(line.info_unit_price, Some(dec!(20.0000)));
    }

    #[test]
    fn test_unit_price_edit_supplier_uses_cost_semantics() {
        let mut line = line();
        line.direction = DocumentDirection::Supplier;
        line.unit_price = Some(dec!(20));
        line.unit_price_changed(PriceDigits::default()).unwrap();

        assert_eq!(line.info_unit_price, Some(dec!(10.0000)));
    }

    #[test]
    fn test_info_quantity_edit_back_computes_quantity() {
        let mut line = line();
        line.info_quantity = Some(dec!(10));
        let fields = line.info_quantity_changed(PriceDigits::default()).unwrap();

        assert_eq!(fields, vec![LineField::Quantity, LineField::Amount]);
        assert_eq!(line.quantity, dec!(5));
    }

    #[test]
    fn test_info_unit_price_edit_back_computes_unit_price() {
        let mut line = line();
        line.info_unit_price = Some(dec!(20));
        let fields = line.info_unit_price_changed(PriceDigits::default()).unwrap();

        assert_eq!(fields, vec![LineField::UnitPrice, LineField::Amount]);
        assert_eq!(line.unit_price, Some(dec!(40.0000)));
    }

    #[test]
    fn test_info_unit_switch_rescales_price_only() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));
        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();

        line.info_unit = Some(UnitOfMeasure::gram());
        let fields = line.info_unit_changed(PriceDigits::default()).unwrap();

        assert_eq!(fields, vec![LineField::InfoUnitPrice]);
        assert_eq!(line.info_unit_price, Some(dec!(20000.0000)));
        assert_eq!(line.unit_price, Some(dec!(40)));
        assert_eq!(line.amount(), Some(dec!(200.00)));
    }

    #[test]
    fn test_recompute_without_product_is_noop() {
        let mut line = Line::new(DocumentDirection::Customer);
        line.quantity = dec!(5);

        assert!(line.quantity_changed(PriceDigits::default()).unwrap().is_empty());
        assert!(line.unit_price_changed(PriceDigits::default()).unwrap().is_empty());
        assert!(line.info_quantity_changed(PriceDigits::default()).unwrap().is_empty());
        assert_eq!(line.quantity, dec!(5));
        assert_eq!(line.info_quantity, None);
    }

    #[test]
    fn test_non_billable_rows_never_recompute() {
        let mut line = line();
        line.kind = LineKind::Subtotal;
        line.quantity = dec!(5);

        assert!(line.quantity_changed(PriceDigits::default()).unwrap().is_empty());
        assert!(line.product_changed(PriceDigits::default()).unwrap().is_empty());
        assert_eq!(line.amount(), None);
    }

    #[test]
    fn test_transitions_are_idempotent() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));
        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();
        let first = line.clone();

        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();
        assert_eq!(line.quantity, first.quantity);
        assert_eq!(line.info_quantity, first.info_quantity);
        assert_eq!(line.info_unit_price, first.info_unit_price);
    }

    #[test]
    fn test_credit_negates_quantities_not_prices() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));
        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();

        let credit = line.credit();
        assert_ne!(credit.id, line.id);
        assert_eq!(credit.quantity, dec!(-5));
        assert_eq!(credit.info_quantity, Some(dec!(-10)));
        assert_eq!(credit.unit_price, Some(dec!(40)));
        assert_eq!(credit.info_unit_price, Some(dec!(20.0000)));
    }

    #[test]
    fn test_validate_finalize_requires_informational_fields() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));

        let err = line.validate_finalize().unwrap_err();
        assert!(err.to_string().contains("info_quantity"));

        line.quantity_changed(PriceDigits::default()).unwrap();
        let err = line.validate_finalize().unwrap_err();
        assert!(err.to_string().contains("info_unit_price"));

        line.unit_price_changed(PriceDigits::default()).unwrap();
        assert!(line.validate_finalize().is_ok());

        // Hidden informational unit: nothing required
        let mut plain = Line::new(DocumentDirection::Customer);
        plain.quantity = dec!(5);
        assert!(plain.validate_finalize().is_ok());
    }

    #[test]
    fn test_to_invoice_line_recomputes_informational_fields() {
        let mut sale_line = line();
        sale_line.quantity = dec!(5);
        sale_line.unit_price = Some(dec!(40));
        sale_line.quantity_changed(PriceDigits::default()).unwrap();
        // Informational price left stale on purpose
        sale_line.info_unit_price = Some(dec!(99));

        let invoice_line = sale_line.to_invoice_line(PriceDigits::default()).unwrap();
        assert_ne!(invoice_line.id, sale_line.id);
        assert_eq!(invoice_line.info_unit_price, Some(dec!(20.0000)));
        assert_eq!(invoice_line.info_quantity, Some(dec!(10)));
        assert_eq!(invoice_line.amount(), Some(dec!(200.00)));
    }

    #[test]
    fn test_amounts() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));
        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();

        assert_eq!(line.amount(), Some(dec!(200.00)));
        assert_eq!(line.info_amount(), Some(dec!(200.00)));
        assert_eq!(line.info_unit_digits(), 2);
    }

    #[test]
    fn test_line_snapshot_json_round_trip() {
        let mut line = line();
        line.quantity = dec!(5);
        line.unit_price = Some(dec!(40));
        line.quantity_changed(PriceDigits::default()).unwrap();
        line.unit_price_changed(PriceDigits::default()).unwrap();

        let json = serde_json::to_string(&line).unwrap();
        let back: Line = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}
