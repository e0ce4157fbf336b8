use chesslens::eval::{
    eval_bar_cells, eval_bar_percent, fragility, fragility_bar_cells, FRAGILITY_TOLERANCE,
};
use proptest::prelude::*;

#[test]
fn single_line_is_fully_solid() {
    assert_eq!(fragility(&[1.3], 1.3, FRAGILITY_TOLERANCE), 1.0);
}

#[test]
fn one_good_move_among_many() {
    // best 2.0, the other three lines lose more than a pawn
    let f = fragility(&[2.0, 0.5, 0.1, -0.4], 2.0, FRAGILITY_TOLERANCE);
    assert_eq!(f, 0.25);
}

#[test]
fn tolerance_edge_counts() {
    let f = fragility(&[0.0, 0.5], 0.0, 0.5);
    assert_eq!(f, 1.0);
}

proptest! {
    #[test]
    fn fragility_is_a_fraction(scores in prop::collection::vec(-20.0f64..20.0, 0..12), tol in 0.0f64..2.0) {
        let best = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let f = fragility(&scores, best, tol);
        prop_assert!((0.0..=1.0).contains(&f));
        if !scores.is_empty() {
            // the best line always matches itself
            prop_assert!(f >= 1.0 / scores.len() as f64 - 1e-12);
        }
    }

    #[test]
    fn eval_bar_is_monotonic_and_clipped(a in -200.0f64..200.0, b in -200.0f64..200.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let plo = eval_bar_percent(lo);
        let phi = eval_bar_percent(hi);
        prop_assert!((0.0..=100.0).contains(&plo));
        prop_assert!((0.0..=100.0).contains(&phi));
        prop_assert!(plo <= phi);
        prop_assert!(eval_bar_cells(lo, 20) <= eval_bar_cells(hi, 20));
    }

    #[test]
    fn fragility_bar_never_overflows(v in -1.0f64..3.0, full in 0u16..600) {
        prop_assert!(fragility_bar_cells(v, full) <= full);
    }
}
