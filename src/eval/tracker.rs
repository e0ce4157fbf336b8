use cozy_chess::{Board, Color, GameStatus};

use super::fragility::fragility;
use super::{Evaluation, LineAggregation};
use crate::uci::protocol::{Bound, InfoLine, Score, MATE_PAWNS};

/// How the searched position ends the game, if it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Checkmate,
    Draw,
}

impl Terminal {
    pub fn of(board: &Board) -> Option<Self> {
        match board.status() {
            GameStatus::Won => Some(Terminal::Checkmate),
            GameStatus::Drawn => Some(Terminal::Draw),
            GameStatus::Ongoing => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Sample {
    depth: u32,
    multipv: u32,
    /// white's perspective
    pawns: f64,
    mate: Option<i32>,
    pv: Vec<String>,
}

/// Collects the score lines of one search and turns them into an
/// [`Evaluation`] once the engine reports its best move.
#[derive(Debug, Clone)]
pub struct SearchTracker {
    side_to_move: Color,
    terminal: Option<Terminal>,
    aggregation: LineAggregation,
    tolerance: f64,
    samples: Vec<Sample>,
}

impl SearchTracker {
    pub fn new(board: &Board, aggregation: LineAggregation, tolerance: f64) -> Self {
        Self {
            side_to_move: board.side_to_move(),
            terminal: Terminal::of(board),
            aggregation,
            tolerance,
            samples: Vec::new(),
        }
    }

    fn white_sign(&self) -> f64 {
        match self.side_to_move {
            Color::White => 1.0,
            Color::Black => -1.0,
        }
    }

    /// Record one `info` line. Lines without an exact score are ignored.
    pub fn observe(&mut self, info: &InfoLine) {
        let Some(score) = info.score else {
            return;
        };
        if info.bound != Bound::Exact {
            return;
        }
        let sign = self.white_sign();
        let mate = match score {
            Score::Mate(n) => Some(n * sign as i32),
            Score::Cp(_) => None,
        };
        self.samples.push(Sample {
            depth: info.depth.unwrap_or(0),
            multipv: info.multipv.unwrap_or(1),
            pawns: score.pawns() * sign,
            mate,
            pv: info.pv.clone(),
        });
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Candidate lines under the configured aggregation, best line first.
    fn candidates(&self) -> Vec<&Sample> {
        match self.aggregation {
            LineAggregation::DepthIterations => {
                let mut lines: Vec<&Sample> = self.samples.iter().collect();
                // best = the deepest report of the main line
                if let Some(pos) = lines.iter().rposition(|s| s.multipv == 1) {
                    let best = lines.remove(pos);
                    lines.insert(0, best);
                }
                lines
            }
            LineAggregation::MultiPv => {
                let mut per_line: Vec<&Sample> = Vec::new();
                for s in &self.samples {
                    match per_line.iter_mut().find(|p| p.multipv == s.multipv) {
                        Some(slot) if s.depth >= slot.depth => *slot = s,
                        Some(_) => {}
                        None => per_line.push(s),
                    }
                }
                per_line.sort_by_key(|s| s.multipv);
                per_line
            }
        }
    }

    /// Close the search. The best score is the deepest multipv-1 report, not
    /// the first one, and fragility is measured against it. Mates count as a
    /// flat ±100 pawns whatever their distance.
    pub fn finish(self, bestmove: Option<String>) -> Evaluation {
        let lines = self.candidates();
        let Some(best) = lines.first() else {
            return self.terminal_evaluation(bestmove);
        };
        let scores: Vec<f64> = lines.iter().map(|s| s.pawns).collect();
        let depth = self.samples.iter().map(|s| s.depth).max().unwrap_or(0);
        Evaluation {
            best: best.pawns,
            mate: best.mate,
            fragility: fragility(&scores, best.pawns, self.tolerance),
            candidates: scores,
            depth,
            bestmove,
            pv: best.pv.clone(),
        }
    }

    fn terminal_evaluation(&self, bestmove: Option<String>) -> Evaluation {
        let (best, mate) = match self.terminal {
            // the side to move has been mated
            Some(Terminal::Checkmate) => (-MATE_PAWNS * self.white_sign(), Some(0)),
            Some(Terminal::Draw) | None => (0.0, None),
        };
        Evaluation {
            best,
            mate,
            candidates: Vec::new(),
            fragility: 0.0,
            depth: 0,
            bestmove,
            pv: Vec::new(),
        }
    }
}
