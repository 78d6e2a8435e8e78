//! Shared helpers for rounding report figures.
//!
//! Report cells are `Decimal`s rounded to one decimal place so the CSV text
//! is identical across runs and platforms, whatever the float noise in the
//! underlying averages.

use rust_decimal::Decimal;

/// Convert an f64 to Decimal, rounded to 1 decimal place.
///
/// Returns `Decimal::ZERO` for non-finite inputs (NaN, ±Inf).
pub(crate) fn f64_to_decimal_1dp(v: f64) -> Decimal {
    if !v.is_finite() {
        tracing::warn!(
            "f64_to_decimal_1dp received non-finite value {}, defaulting to 0",
            v
        );
        return Decimal::ZERO;
    }
    Decimal::from_str_exact(&format!("{:.1}", v)).unwrap_or_default()
}

/// Convert a whole count to a Decimal with one decimal place (`3` → `3.0`).
pub(crate) fn count_to_decimal_1dp(v: u32) -> Decimal {
    Decimal::new(i64::from(v) * 10, 1)
}
