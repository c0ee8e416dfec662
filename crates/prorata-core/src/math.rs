// ─────────────────────────────────────────────────────────────────
// Checked arithmetic and the signed/unsigned boundary.
//
// The correction term is the only signed quantity in the system;
// every widen/narrow between u128 and i128 goes through this module
// so sign-crossing never leaks into the accounting code.
// ─────────────────────────────────────────────────────────────────

use crate::errors::DividendError;

/// Checked u128 addition. `ctx` names the operation for the error message.
pub fn checked_add(a: u128, b: u128, ctx: &'static str) -> Result<u128, DividendError> {
    a.checked_add(b).ok_or(DividendError::Overflow(ctx))
}

/// Checked u128 subtraction; underflow is reported as overflow of `ctx`.
pub fn checked_sub(a: u128, b: u128, ctx: &'static str) -> Result<u128, DividendError> {
    a.checked_sub(b).ok_or(DividendError::Overflow(ctx))
}

/// Checked u128 multiplication.
pub fn checked_mul(a: u128, b: u128, ctx: &'static str) -> Result<u128, DividendError> {
    a.checked_mul(b).ok_or(DividendError::Overflow(ctx))
}

/// Widen an unsigned value into the signed domain.
/// Fails if the value exceeds i128::MAX (cannot be represented).
pub fn widen_signed(v: u128, ctx: &'static str) -> Result<i128, DividendError> {
    i128::try_from(v).map_err(|_| DividendError::Overflow(ctx))
}

/// Narrow a signed value back to unsigned.
/// The caller is responsible for having established non-negativity;
/// a negative input here is an overflow of `ctx`, not a sign error.
pub fn narrow_unsigned(v: i128, ctx: &'static str) -> Result<u128, DividendError> {
    u128::try_from(v).map_err(|_| DividendError::Overflow(ctx))
}

/// Checked i128 addition (signed correction accumulation).
pub fn checked_add_signed(a: i128, b: i128, ctx: &'static str) -> Result<i128, DividendError> {
    a.checked_add(b).ok_or(DividendError::Overflow(ctx))
}
