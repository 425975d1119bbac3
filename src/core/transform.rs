//! Conversion of an upstream spot quote into the retail price per gram.

use crate::core::error::QuoteError;
use crate::core::quote::RawQuote;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const GRAMS_PER_TROY_OUNCE: Decimal = dec!(31.1035);

/// Retail markup applied on top of the spot price.
pub const DEFAULT_MARKUP: Decimal = dec!(1.085);

/// Returns `(price_per_ounce / 31.1035) * markup`, rounded to 2 places.
pub fn price_per_gram(price_per_ounce: f64, markup: Decimal) -> Result<Decimal, QuoteError> {
    if !price_per_ounce.is_finite() {
        return Err(QuoteError::TransformationFailed(format!(
            "Spot price is not a finite number: {price_per_ounce}"
        )));
    }
    if price_per_ounce <= 0.0 {
        return Err(QuoteError::TransformationFailed(format!(
            "Spot price must be positive, got {price_per_ounce}"
        )));
    }
    if markup <= Decimal::ZERO {
        return Err(QuoteError::TransformationFailed(format!(
            "Markup must be positive, got {markup}"
        )));
    }

    let spot = Decimal::try_from(price_per_ounce).map_err(|e| {
        QuoteError::TransformationFailed(format!(
            "Spot price {price_per_ounce} is out of range: {e}"
        ))
    })?;

    let per_gram = spot
        .checked_div(GRAMS_PER_TROY_OUNCE)
        .and_then(|p| p.checked_mul(markup))
        .ok_or_else(|| {
            QuoteError::TransformationFailed(format!("Overflow converting spot price {spot}"))
        })?;

    Ok(per_gram.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

pub fn retail_quote(raw: &RawQuote, markup: Decimal) -> Result<Decimal, QuoteError> {
    price_per_gram(raw.price_per_ounce, markup)
}
