//! The game being replayed: tags, resolved plies, and position replay.

pub mod cursor;
pub mod pgn;
pub mod san;

pub use cursor::Cursor;

use cozy_chess::{Board, Move};

use crate::error::{Error, Result};
use san::SanError;

/// Gukesh D - Carlsen, Norway Chess 2025, round 6.
pub const EMBEDDED_PGN: &str = include_str!("norway_2025_r6.pgn");

#[derive(Debug, Clone, PartialEq)]
pub struct Ply {
    /// SAN as written in the source
    pub san: String,
    pub mv: Move,
    /// Standard UCI form (castling as `e1g1`)
    pub uci: String,
}

#[derive(Debug, Clone)]
pub struct Game {
    tags: Vec<(String, String)>,
    plies: Vec<Ply>,
    result: Option<String>,
    start: Board,
}

impl Game {
    /// The game compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_pgn(EMBEDDED_PGN)
    }

    /// Parse and validate a PGN game by replaying every move.
    pub fn from_pgn(text: &str) -> Result<Self> {
        let parsed = pgn::parse_pgn(text)?;
        let start = match parsed.tag("FEN") {
            Some(fen) => Board::from_fen(fen, false)
                .map_err(|e| Error::Fen(format!("{} ({:?})", fen, e)))?,
            None => Board::default(),
        };

        let mut board = start.clone();
        let mut plies = Vec::with_capacity(parsed.sans.len());
        for (i, token) in parsed.sans.iter().enumerate() {
            let mv = san::parse_san(&board, token).map_err(|e| match e {
                SanError::Ambiguous => Error::AmbiguousSan {
                    ply: i + 1,
                    san: token.clone(),
                    fen: board.to_string(),
                },
                SanError::Malformed | SanError::NoMatch => Error::IllegalSan {
                    ply: i + 1,
                    san: token.clone(),
                    fen: board.to_string(),
                },
            })?;
            let uci = san::move_to_uci(&board, mv);
            plies.push(Ply {
                san: token.clone(),
                mv,
                uci,
            });
            board.play(mv);
        }
        log::debug!("loaded game with {} plies", plies.len());

        Ok(Self {
            tags: parsed.tags,
            plies,
            result: parsed.result,
            start,
        })
    }

    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    pub fn sans(&self) -> Vec<&str> {
        self.plies.iter().map(|p| p.san.as_str()).collect()
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn title(&self) -> String {
        format!(
            "{} - {}",
            self.tag("White").unwrap_or("?"),
            self.tag("Black").unwrap_or("?")
        )
    }

    pub fn start_position(&self) -> Board {
        self.start.clone()
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.plies.len())
    }

    /// Position after `ply` plies, replayed from the start. Clamped to the end.
    pub fn position_at(&self, ply: usize) -> Board {
        let mut board = self.start.clone();
        for p in &self.plies[..ply.min(self.plies.len())] {
            board.play(p.mv);
        }
        board
    }

    pub fn fen_at(&self, ply: usize) -> String {
        self.position_at(ply).to_string()
    }

    /// The ply that produced the position at `index`, if any.
    pub fn ply_before(&self, index: usize) -> Option<&Ply> {
        index.checked_sub(1).and_then(|i| self.plies.get(i))
    }
}
