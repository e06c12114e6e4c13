//! Fixed-precision pricing arithmetic for order line items.
//!
//! All computation is done on [`Decimal`] values at full precision;
//! only the reported figures are rounded, to 2 decimal places with
//! half-up rounding. Tax is always derived from the unrounded taxable
//! base so that per-item rounding never compounds.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default tax percentage applied when a line item does not specify one
/// (19% VAT).
pub const DEFAULT_TAX_PERCENTAGE: Decimal = dec!(19);

/// Currency precision of all reported monetary figures.
const CURRENCY_DP: u32 = 2;

const HUNDRED: Decimal = dec!(100);

/// Errors raised when pricing inputs are out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Unit price must not be negative.
    #[error("Invalid unit price: {0} (must not be negative)")]
    NegativeUnitPrice(Decimal),

    /// Quantity must be greater than zero.
    #[error("Invalid quantity: {0} (must be greater than 0)")]
    InvalidQuantity(u32),

    /// A percentage was outside the closed range [0, 100].
    #[error("Invalid {field} percentage: {value} (must be between 0 and 100)")]
    PercentageOutOfRange {
        field: &'static str,
        value: Decimal,
    },
}

/// Computed monetary figures for a single line item, rounded to
/// currency precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTotals {
    /// unit_price × quantity.
    pub subtotal: Decimal,
    /// subtotal × discount_percentage / 100.
    pub discount_amount: Decimal,
    /// (subtotal − discount) × tax_percentage / 100.
    pub tax_amount: Decimal,
    /// subtotal − discount_amount + tax_amount.
    pub total: Decimal,
}

/// Order-level monetary figures: the exact sums of the per-line totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

fn round_currency(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    // Pin the scale so exact values still report two decimal places
    // (175 and 175.00 are equal but serialize differently).
    rounded.rescale(CURRENCY_DP);
    rounded
}

fn check_percentage(field: &'static str, value: Decimal) -> Result<(), AmountError> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(AmountError::PercentageOutOfRange { field, value });
    }
    Ok(())
}

/// Computes the monetary figures for one line item.
///
/// Discount and tax are derived from the full-precision subtotal and
/// taxable base; each reported figure is rounded once, and the total is
/// rebuilt from the rounded components so that
/// `total == subtotal − discount_amount + tax_amount` holds exactly on
/// the persisted values.
pub fn line_totals(
    unit_price: Decimal,
    quantity: u32,
    discount_percentage: Decimal,
    tax_percentage: Decimal,
) -> Result<LineTotals, AmountError> {
    if unit_price < Decimal::ZERO {
        return Err(AmountError::NegativeUnitPrice(unit_price));
    }
    if quantity == 0 {
        return Err(AmountError::InvalidQuantity(quantity));
    }
    check_percentage("discount", discount_percentage)?;
    check_percentage("tax", tax_percentage)?;

    let subtotal = unit_price * Decimal::from(quantity);
    let discount = subtotal * discount_percentage / HUNDRED;
    let taxable_base = subtotal - discount;
    let tax = taxable_base * tax_percentage / HUNDRED;

    let subtotal_r = round_currency(subtotal);
    let discount_r = round_currency(discount);
    let tax_r = round_currency(tax);

    Ok(LineTotals {
        subtotal: subtotal_r,
        discount_amount: discount_r,
        tax_amount: tax_r,
        total: subtotal_r - discount_r + tax_r,
    })
}

/// Sums per-line figures into order-level totals.
pub fn order_totals<'a, I>(lines: I) -> OrderTotals
where
    I: IntoIterator<Item = &'a LineTotals>,
{
    let mut totals = OrderTotals::default();
    for line in lines {
        totals.subtotal += line.subtotal;
        totals.discount_amount += line.discount_amount;
        totals.tax_amount += line.tax_amount;
        totals.total_amount += line.total;
    }
    totals
}
