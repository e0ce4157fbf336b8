/// Pawns within which a candidate line counts as matching the best line.
pub const FRAGILITY_TOLERANCE: f64 = 0.2;

/// Fraction of `scores` within `tolerance` pawns of `best`.
///
/// An empty list has fragility 0.
pub fn fragility(scores: &[f64], best: f64, tolerance: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let good = scores
        .iter()
        .filter(|s| (**s - best).abs() <= tolerance)
        .count();
    good as f64 / scores.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(fragility(&[], 0.3, FRAGILITY_TOLERANCE), 0.0);
    }

    #[test]
    fn all_equal_is_one() {
        assert_eq!(fragility(&[0.4, 0.4, 0.4], 0.4, FRAGILITY_TOLERANCE), 1.0);
    }

    #[test]
    fn counts_within_tolerance_inclusive() {
        // 0.5 and 0.25 are within 0.25 of 0.5; -1.0 is not
        let f = fragility(&[0.5, 0.25, -1.0, 0.75], 0.5, 0.25);
        assert!((f - 0.75).abs() < 1e-12, "got {}", f);
    }
}
