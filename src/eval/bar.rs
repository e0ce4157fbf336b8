//! Geometry of the evaluation and fragility bars.

/// Scores beyond this many pawns pin the evaluation bar.
pub const EVAL_CLIP: f64 = 5.0;

/// Height of the fragility bar when it is full, in pixels.
pub const FRAGILITY_BAR_PX: u16 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillSide {
    White,
    Black,
}

fn clip(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-EVAL_CLIP, EVAL_CLIP)
    }
}

/// Share of the bar (0..=100) filled for a white-perspective score in pawns.
pub fn eval_bar_percent(score: f64) -> f64 {
    (clip(score) + EVAL_CLIP) / (2.0 * EVAL_CLIP) * 100.0
}

pub fn eval_bar_fill(score: f64) -> FillSide {
    if clip(score) >= 0.0 {
        FillSide::White
    } else {
        FillSide::Black
    }
}

/// Filled rows of a bar `rows` tall, counted from the bottom.
pub fn eval_bar_cells(score: f64, rows: u16) -> u16 {
    let filled = (eval_bar_percent(score) / 100.0 * rows as f64).round();
    (filled as u16).min(rows)
}

pub fn fragility_bar_cells(value: f64, full: u16) -> u16 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    ((v * full as f64).round() as u16).min(full)
}
