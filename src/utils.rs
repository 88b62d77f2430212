//! Shared tolerances and small numeric helpers.

/// Share counts below this are dust: a sell may overshoot the held count by
/// at most this much, and a position left with fewer shares is removed.
pub const SHARE_EPSILON: f64 = 1e-4;

/// Total dollar values at or below this are treated as zero when weighting.
pub const VALUE_EPSILON: f64 = 1e-9;

pub fn sanitize_symbol(sym: &str) -> String {
    sym.trim().to_uppercase()
}

/// Round to one decimal place (deltas and allocation percentages).
pub fn round1(v: f64) -> f64 {
    let r = (v * 10.0).round() / 10.0;
    // avoid "-0.0" in output
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Round to the nearest integer score and clamp into [0, 100].
pub fn clamp_score(v: f64) -> u8 {
    v.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_and_uppercases() {
        assert_eq!(sanitize_symbol("  aapl "), "AAPL");
    }

    #[test]
    fn round1_half_away_and_no_negative_zero() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(-0.04), 0.0);
        assert!(round1(-0.04).is_sign_positive());
        assert_eq!(round1(33.333), 33.3);
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(72.5), 73);
    }
}
