//! Discount pricing rule
//!
//! `updatedPrice` is a derived field: it is recomputed from `price` and
//! `discount` on every create and update, and the client-side preview calls
//! the same function so that the two can never disagree by a cent.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of decimal places prices are kept at
pub const PRICE_SCALE: u32 = 2;

/// Largest accepted discount, in percent
pub const MAX_DISCOUNT: Decimal = Decimal::ONE_HUNDRED;

/// Largest accepted list price
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round a monetary amount to cents, half away from zero
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp a discount percentage into `[0, 100]`
pub fn clamp_discount(discount: Decimal) -> Decimal {
    discount.clamp(Decimal::ZERO, MAX_DISCOUNT)
}

/// Compute the sale price for `price` after `discount` percent off
///
/// An absent or zero discount leaves the price untouched. Otherwise the
/// result is `price - price * discount / 100` rounded to cents. Out-of-range
/// discounts are clamped here; the API rejects them before they get this far.
pub fn compute_updated_price(price: Decimal, discount: Option<Decimal>) -> Decimal {
    let discount = clamp_discount(discount.unwrap_or(Decimal::ZERO));
    if discount.is_zero() {
        return price;
    }

    let reduction = price * discount / Decimal::ONE_HUNDRED;
    round_price(price - reduction)
}

/// Parse a typed amount and normalise it the way the API stores it
///
/// The text is read as a JSON number would be (nearest `f64`), then rounded
/// to cents in decimal arithmetic. `None` for text that is not a finite number.
pub fn normalize_amount(raw: &str) -> Option<Decimal> {
    let amount = raw.trim().parse::<f64>().ok().filter(|f| f.is_finite())?;
    Decimal::from_str(&amount.to_string()).ok().map(round_price)
}

/// Amount taken off `price` by `discount`, in cents precision
pub fn discount_amount(price: Decimal, discount: Option<Decimal>) -> Decimal {
    price - compute_updated_price(price, discount)
}
