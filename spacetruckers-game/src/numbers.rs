//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 half away from zero, saturating at the i64 bounds, returning 0 for NaN.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    saturating_f64_to_i64(value.round())
}

/// Ceil a f64, saturating at the i64 bounds, returning 0 for non-finite values.
#[must_use]
pub fn ceil_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    saturating_f64_to_i64(value.ceil())
}

/// Integral f64 into i64, saturating at the bound matching its sign.
fn saturating_f64_to_i64(value: f64) -> i64 {
    cast::<f64, i64>(value).unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Ceil a non-negative f64 into a u32, saturating at the type bounds.
#[must_use]
pub fn ceil_f64_to_u32(value: f64) -> u32 {
    clamp_i64_to_u32(ceil_f64_to_i64(value))
}

/// Clamp an i64 into the u32 range.
#[must_use]
pub fn clamp_i64_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_matches_half_away_from_zero() {
        assert_eq!(round_f64_to_i64(1.5), 2);
        assert_eq!(round_f64_to_i64(2.4), 2);
        assert_eq!(round_f64_to_i64(f64::NAN), 0);
        assert_eq!(round_f64_to_i64(f64::MAX), i64::MAX);
    }

    #[test]
    fn ceil_clamps_and_handles_nan() {
        assert_eq!(ceil_f64_to_i64(1.2), 2);
        assert_eq!(ceil_f64_to_i64(f64::NAN), 0);
        assert_eq!(ceil_f64_to_u32(-3.5), 0);
        assert_eq!(ceil_f64_to_u32(29.01), 30);
    }

    #[test]
    fn huge_values_saturate_toward_their_sign() {
        assert_eq!(round_f64_to_i64(f64::MIN), i64::MIN);
        assert_eq!(round_f64_to_i64(1e300), i64::MAX);
        assert_eq!(ceil_f64_to_i64(f64::MAX), i64::MAX);
        assert_eq!(ceil_f64_to_i64(-1e300), i64::MIN);
        assert_eq!(ceil_f64_to_u32(1e12), u32::MAX);
        assert_eq!(ceil_f64_to_u32(-1e300), 0);
    }

    #[test]
    fn u32_clamp_saturates() {
        assert_eq!(clamp_i64_to_u32(-1), 0);
        assert_eq!(clamp_i64_to_u32(i64::MAX), u32::MAX);
        assert_eq!(clamp_i64_to_u32(42), 42);
    }
}
