//! Shared scoring primitives used by every engine.
//!
//! All scores in this workspace are bounded to [-1, 1]. `band` is the single
//! rescaling rule: a metric is mapped linearly from its `[low, high]` band onto
//! that range and saturates outside it.

/// Bound `value` to `[min, max]`.
///
/// Unlike `f64::clamp` this never panics, so it is safe with bounds that come
/// from user-supplied configuration.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Rescale `value` from `[low, high]` onto `[-1, 1]`, saturating at both ends.
///
/// Returns 0.0 for a degenerate band (`high <= low`).
pub fn band(value: f64, low: f64, high: f64) -> f64 {
    if high <= low {
        return 0.0;
    }
    let scaled = (value - low) / (high - low);
    clamp(scaled * 2.0 - 1.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_band_endpoints_and_midpoint() {
        assert_eq!(band(0.0, 0.0, 1.0), -1.0);
        assert_eq!(band(-5.0, 0.0, 1.0), -1.0);
        assert_eq!(band(1.0, 0.0, 1.0), 1.0);
        assert_eq!(band(7.0, 0.0, 1.0), 1.0);
        assert_abs_diff_eq!(band(0.40, 0.20, 0.60), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_band_degenerate() {
        assert_eq!(band(0.5, 1.0, 1.0), 0.0);
        assert_eq!(band(0.5, 2.0, 1.0), 0.0);
        assert_eq!(band(100.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_band_monotonic() {
        let mut previous = f64::NEG_INFINITY;
        for i in -200..=200 {
            let x = i as f64 * 0.01;
            let value = band(x, -0.5, 0.8);
            assert!(value >= previous, "band decreased at x={}", x);
            assert!((-1.0..=1.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn test_clamp_inverted_bounds_does_not_panic() {
        // max wins when the bounds are inverted
        assert_eq!(clamp(5.0, 3.0, 1.0), 1.0);
        assert_eq!(clamp(0.5, -1.0, 1.0), 0.5);
    }
}
