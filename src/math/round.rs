//! Rounding conventions shared by every derived number.
//!
//! All call sites (time series, item table, progress, snapshot) go through these
//! helpers so the same input always rounds the same way.
//!
//! Rounding is half-up toward positive infinity (`floor(x * 10^d + 0.5)`), so
//! `-2.5` rounds to `-2` and `2.5` rounds to `3`.

/// Round `value` to `decimals` fractional digits, half-up.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor + 0.5).floor() / factor;
    // Normalize `-0.0` so it never leaks into output.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round to the nearest integer, half-up.
pub fn round_int(value: f64) -> f64 {
    round_to(value, 0)
}

/// `current / prior * 100`, or `None` when `prior` is not positive.
///
/// A zero (or negative) prior has no meaningful YoY; it is reported as absent
/// rather than infinite or zero.
pub fn pct_of(current: f64, prior: f64) -> Option<f64> {
    if prior > 0.0 && current.is_finite() && prior.is_finite() {
        Some(current / prior * 100.0)
    } else {
        None
    }
}

/// YoY percentage rounded to 2 decimals.
pub fn yoy_pct(current: f64, prior: f64) -> Option<f64> {
    pct_of(current, prior).map(|p| round_to(p, 2))
}

/// YoY ratio derived from an already-rounded percentage (4 decimals).
///
/// Never computed from the raw values, so ratio and pct cannot drift apart.
pub fn yoy_ratio(pct: Option<f64>) -> Option<f64> {
    pct.map(|p| round_to(p / 100.0, 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(123.456, 2), 123.46);
        assert_eq!(round_to(99.94, 1), 99.9);
        assert_eq!(round_int(-0.4), 0.0);
        assert!(round_int(-0.4).is_sign_positive());
    }

    #[test]
    fn zero_prior_has_no_yoy() {
        assert_eq!(yoy_pct(100.0, 0.0), None);
        assert_eq!(yoy_pct(100.0, -10.0), None);
        assert_eq!(yoy_ratio(yoy_pct(100.0, 0.0)), None);
    }

    #[test]
    fn ratio_is_rounded_pct_over_100() {
        let pct = yoy_pct(100.0, 50.0);
        assert_eq!(pct, Some(200.0));
        assert_eq!(yoy_ratio(pct), Some(2.0));

        let pct = yoy_pct(1.0, 3.0).unwrap();
        assert_eq!(pct, 33.33);
        assert_eq!(yoy_ratio(Some(pct)), Some(round_to(pct / 100.0, 4)));
    }
}
