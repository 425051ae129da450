//! Odds and probability conversion.
//!
//! Pure functions over `f64`; no state. American odds are the canonical
//! quoting format, decimal quotes are normalized into it on ingest.

use crate::error::{Result, TdError};

/// Lower bound for the final adjusted probability
pub const ADJUSTED_PROB_FLOOR: f64 = 0.01;
/// Upper bound for the final adjusted probability
pub const ADJUSTED_PROB_CEIL: f64 = 0.95;

/// Sentinel American odds for degenerate decimal quotes (d <= 1.0)
const DEGENERATE_DECIMAL_SENTINEL: i64 = -1000;

/// Quoting format inferred from a raw price's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFormat {
    American,
    Decimal,
}

impl PriceFormat {
    /// Classify a raw price by magnitude: strictly between 1.0 and 10.0 is
    /// decimal, anything else is American. Safe because American magnitudes
    /// are always >= 100.
    pub fn classify(raw: f64) -> Self {
        if raw > 1.0 && raw < 10.0 {
            PriceFormat::Decimal
        } else {
            PriceFormat::American
        }
    }
}

/// Convert American odds to implied probability (0..1).
pub fn american_to_probability(odds: f64) -> Result<f64> {
    if odds == 0.0 {
        return Err(TdError::InvalidOdds(odds));
    }
    if odds < 0.0 {
        Ok(-odds / (-odds + 100.0))
    } else {
        Ok(100.0 / (odds + 100.0))
    }
}

/// Convert probability (0..1) to American odds. The input is clamped into
/// [0.001, 0.999] first so the output stays finite. Rounding is nearest
/// integer, ties away from zero.
pub fn probability_to_american(p: f64) -> i64 {
    let p = clamp_probability(p, 0.001, 0.999);
    if p >= 0.5 {
        (-100.0 * p / (1.0 - p)).round() as i64
    } else {
        (100.0 * (1.0 - p) / p).round() as i64
    }
}

/// Convert decimal odds to American odds.
pub fn decimal_to_american(d: f64) -> i64 {
    if d <= 1.0 {
        return DEGENERATE_DECIMAL_SENTINEL;
    }
    if d >= 2.0 {
        ((d - 1.0) * 100.0).round() as i64
    } else {
        (-100.0 / (d - 1.0)).round() as i64
    }
}

/// Clamp a probability into [lo, hi].
pub fn clamp_probability(p: f64, lo: f64, hi: f64) -> f64 {
    p.max(lo).min(hi)
}

/// Clamp the final adjusted probability so downstream fair odds stay finite
/// and non-degenerate.
pub fn clamp_adjusted(p: f64) -> f64 {
    clamp_probability(p, ADJUSTED_PROB_FLOOR, ADJUSTED_PROB_CEIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-4;

    #[test]
    fn test_american_to_probability_boundaries() {
        assert!((american_to_probability(-100.0).unwrap() - 0.5).abs() < TOL);
        assert!((american_to_probability(100.0).unwrap() - 0.5).abs() < TOL);
        assert!((american_to_probability(150.0).unwrap() - 0.4).abs() < TOL);
        assert!((american_to_probability(-150.0).unwrap() - 0.6).abs() < TOL);
    }

    #[test]
    fn test_zero_american_odds_rejected() {
        assert!(matches!(
            american_to_probability(0.0),
            Err(TdError::InvalidOdds(_))
        ));
    }

    #[test]
    fn test_probability_to_american_boundary() {
        assert_eq!(probability_to_american(0.5), -100);
        assert_eq!(probability_to_american(0.4), 150);
        assert_eq!(probability_to_american(0.6), -150);
    }

    #[test]
    fn test_round_trip_within_rounding_tolerance() {
        for i in 1..100 {
            let p = i as f64 / 100.0;
            let odds = probability_to_american(p);
            let back = american_to_probability(odds as f64).unwrap();
            // Integer rounding of the odds perturbs the probability slightly
            assert!(
                (back - p).abs() < 0.005,
                "p={p} odds={odds} back={back}"
            );
        }
    }

    #[test]
    fn test_decimal_to_american() {
        assert_eq!(decimal_to_american(1.0), -1000);
        assert_eq!(decimal_to_american(0.5), -1000);
        assert_eq!(decimal_to_american(2.5), 150);
        assert_eq!(decimal_to_american(1.5), -200);
    }

    #[test]
    fn test_price_format_boundaries() {
        assert_eq!(PriceFormat::classify(1.0), PriceFormat::American);
        assert_eq!(PriceFormat::classify(1.01), PriceFormat::Decimal);
        assert_eq!(PriceFormat::classify(9.99), PriceFormat::Decimal);
        assert_eq!(PriceFormat::classify(10.0), PriceFormat::American);
        assert_eq!(PriceFormat::classify(100.0), PriceFormat::American);
        assert_eq!(PriceFormat::classify(-100.0), PriceFormat::American);
    }

    #[test]
    fn test_clamp_adjusted_bounds() {
        assert_eq!(clamp_adjusted(0.001), 0.01);
        assert_eq!(clamp_adjusted(0.99), 0.95);
        assert_eq!(clamp_adjusted(0.5), 0.5);
    }
}
