//! Turning engine output into what the viewer shows: the evaluation of a
//! position, its fragility, and the bar and text widgets' values.

pub mod bar;
pub mod fragility;
pub mod tracker;

pub use bar::{eval_bar_cells, eval_bar_fill, eval_bar_percent, fragility_bar_cells, FillSide};
pub use fragility::{fragility, FRAGILITY_TOLERANCE};
pub use tracker::{SearchTracker, Terminal};

pub use crate::uci::protocol::{Score, MATE_PAWNS};

/// Which engine lines count as candidates for the fragility ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAggregation {
    /// One score per depth iteration of a single-PV search.
    DepthIterations,
    /// The deepest score of each MultiPV line.
    MultiPv,
}

impl LineAggregation {
    pub fn for_multipv(multipv: u32) -> Self {
        if multipv > 1 {
            LineAggregation::MultiPv
        } else {
            LineAggregation::DepthIterations
        }
    }
}

/// A finished search of one position. Scores are in pawns from white's
/// point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub best: f64,
    /// Moves to mate for the best line, positive when white mates.
    pub mate: Option<i32>,
    pub candidates: Vec<f64>,
    pub fragility: f64,
    pub depth: u32,
    /// Engine's best move in UCI notation
    pub bestmove: Option<String>,
    pub pv: Vec<String>,
}

impl Evaluation {
    /// `0.35`, `-1.20`, or `M3` / `-M3` for mates.
    pub fn score_label(&self) -> String {
        match self.mate {
            Some(n) => {
                let sign = if self.best < 0.0 { "-" } else { "" };
                format!("{}M{}", sign, n.abs())
            }
            None => format!("{:.2}", self.best),
        }
    }

    /// Score in centipawns, white's perspective, with mates at ±100 pawns.
    pub fn score_cp(&self) -> i32 {
        (self.best * 100.0).round() as i32
    }

    pub fn info_text(&self) -> String {
        info_text(&self.score_label(), self.fragility)
    }
}

pub fn info_text(score_label: &str, fragility: f64) -> String {
    format!(
        "Eval: {} | Fragility: {:.0}%",
        score_label,
        fragility * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(best: f64, mate: Option<i32>, fragility: f64) -> Evaluation {
        Evaluation {
            best,
            mate,
            candidates: vec![best],
            fragility,
            depth: 12,
            bestmove: None,
            pv: Vec::new(),
        }
    }

    #[test]
    fn info_text_matches_widget_format() {
        assert_eq!(eval(0.3, None, 0.5).info_text(), "Eval: 0.30 | Fragility: 50%");
        assert_eq!(eval(-1.234, None, 1.0).info_text(), "Eval: -1.23 | Fragility: 100%");
    }

    #[test]
    fn mate_labels() {
        assert_eq!(eval(MATE_PAWNS, Some(3), 1.0).score_label(), "M3");
        assert_eq!(eval(-MATE_PAWNS, Some(-2), 1.0).score_label(), "-M2");
        assert_eq!(eval(-MATE_PAWNS, Some(0), 0.0).score_cp(), -10_000);
    }
}
