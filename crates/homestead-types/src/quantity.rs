//! Step quantization for good quantities.
//!
//! Goods trade in indivisible units: a `step_amount` of `0.5` means half
//! units exist but quarter units do not. Production output is rounded
//! *down* to its step (an activity never over-promises output), while
//! remaining input stock is rounded *up* to its step (the reported
//! inventory never shows a fractional leftover below the smallest
//! tradable unit). Together the two roundings are conservative against
//! the producing activity.
//!
//! All helpers return `None` when the step is not strictly positive or
//! when checked [`Decimal`] arithmetic fails.

use rust_decimal::Decimal;

/// Round `value` down to the nearest multiple of `step`.
///
/// Returns `None` if `step` is zero or negative, or if the intermediate
/// division/multiplication overflows.
pub fn floor_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return None;
    }
    let quotient = value.checked_div(step)?;
    quotient.floor().checked_mul(step)
}

/// Round `value` up to the nearest multiple of `step`.
///
/// Returns `None` if `step` is zero or negative, or if the intermediate
/// division/multiplication overflows.
pub fn ceil_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    if step <= Decimal::ZERO {
        return None;
    }
    let quotient = value.checked_div(step)?;
    quotient.ceil().checked_mul(step)
}
