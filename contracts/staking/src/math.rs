//! Fixed-point arithmetic over a 10^12 scale.
//!
//! Every monetary computation in this contract routes through these helpers;
//! no other module performs scaled-integer math inline. All operations are
//! checked and surface [`Error::Overflow`], [`Error::Underflow`], or
//! [`Error::DivideByZero`] instead of wrapping or panicking.

use crate::Error;

/// Fixed-point scaling factor.
///
/// A value of `SCALE` represents 1.0 (100%). Using 10^12 gives 12 decimal
/// places of precision, which is more than sufficient for token amounts up
/// to 10^18.
pub const SCALE: i128 = 1_000_000_000_000;

/// Checked addition.
pub fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::Overflow)
}

/// Checked subtraction.
pub fn sub(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_sub(b).ok_or(Error::Underflow)
}

/// Multiply-then-divide in a single step: `a × b / den`.
///
/// Keeping the division last bounds the precision loss of the whole
/// expression at one unit in the last place. Callers composing several
/// factors should fold them into as few `mul_div` calls as possible rather
/// than chaining `mul` and `div`.
pub fn mul_div(a: i128, b: i128, den: i128) -> Result<i128, Error> {
    if den == 0 {
        return Err(Error::DivideByZero);
    }
    let product = a.checked_mul(b).ok_or(Error::Overflow)?;
    Ok(product / den)
}

/// Fixed-point multiplication: `a × b` where both operands are scaled.
pub fn mul(a: i128, b: i128) -> Result<i128, Error> {
    mul_div(a, b, SCALE)
}

/// Fixed-point division: `a / b` producing a scaled result.
pub fn div(a: i128, b: i128) -> Result<i128, Error> {
    mul_div(a, SCALE, b)
}

/// Bound `x` to the inclusive range `[lo, hi]`.
pub fn clamp(x: i128, lo: i128, hi: i128) -> i128 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Weighted average of two values: `(a·wa + b·wb) / (wa + wb)`.
///
/// Fails with `DivideByZero` when both weights are zero. The result always
/// lies between `a` and `b` for non-negative weights.
pub fn weighted_average(a: i128, wa: i128, b: i128, wb: i128) -> Result<i128, Error> {
    let total = add(wa, wb)?;
    if total == 0 {
        return Err(Error::DivideByZero);
    }
    let lhs = a.checked_mul(wa).ok_or(Error::Overflow)?;
    let rhs = b.checked_mul(wb).ok_or(Error::Overflow)?;
    Ok(add(lhs, rhs)? / total)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn mul_div_is_exact_for_divisible_inputs() {
        assert_eq!(mul_div(1_000, 300, 100), Ok(3_000));
    }

    #[test]
    fn mul_div_floors_toward_zero() {
        // 7 × 3 / 2 = 10.5 → 10
        assert_eq!(mul_div(7, 3, 2), Ok(10));
    }

    #[test]
    fn mul_div_zero_denominator_fails() {
        assert_eq!(mul_div(1, 1, 0), Err(Error::DivideByZero));
    }

    #[test]
    fn mul_div_overflow_is_detected() {
        assert_eq!(mul_div(i128::MAX, 2, 1), Err(Error::Overflow));
    }

    #[test]
    fn fixed_point_mul_round_trips_scale() {
        // 0.5 × 0.5 = 0.25
        assert_eq!(mul(SCALE / 2, SCALE / 2), Ok(SCALE / 4));
    }

    #[test]
    fn fixed_point_div_produces_scaled_ratio() {
        // 10 / 40 = 0.25
        assert_eq!(div(10, 40), Ok(SCALE / 4));
    }

    #[test]
    fn add_overflow_is_detected() {
        assert_eq!(add(i128::MAX, 1), Err(Error::Overflow));
    }

    #[test]
    fn sub_underflow_is_detected() {
        assert_eq!(sub(i128::MIN, 1), Err(Error::Underflow));
    }

    #[test]
    fn clamp_bounds_both_sides() {
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
        assert_eq!(clamp(7, 0, 10), 7);
    }

    #[test]
    fn weighted_average_between_inputs() {
        // (0×100 + 1000×300) / 400 = 750
        assert_eq!(weighted_average(0, 100, 1_000, 300), Ok(750));
    }

    #[test]
    fn weighted_average_zero_weights_fails() {
        assert_eq!(weighted_average(1, 0, 2, 0), Err(Error::DivideByZero));
    }
}
