//! Board renderer: a position becomes 64 display cells.
//!
//! Cells are ordered the way the board is drawn, rank 8 first, files a to h
//! within each rank. Nothing here knows about the terminal.

use cozy_chess::{Board, Color, File, Piece, Rank, Square};

use crate::game::san::piece_at;

pub const LIGHT_SQUARE: (u8, u8, u8) = (0xf0, 0xd9, 0xb5);
pub const DARK_SQUARE: (u8, u8, u8) = (0xb5, 0x88, 0x63);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

impl Shade {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Shade::Light => LIGHT_SQUARE,
            Shade::Dark => DARK_SQUARE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub square: Square,
    pub shade: Shade,
    pub piece: Option<(Color, Piece)>,
}

impl Cell {
    /// Asset-style code such as `wp` or `bk`.
    pub fn piece_code(&self) -> Option<String> {
        self.piece.map(|(c, p)| piece_code(c, p))
    }

    pub fn glyph(&self) -> char {
        self.piece.map_or(' ', |(c, p)| piece_glyph(c, p))
    }
}

pub fn piece_code(color: Color, piece: Piece) -> String {
    let c = match color {
        Color::White => 'w',
        Color::Black => 'b',
    };
    let p = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    format!("{}{}", c, p)
}

pub fn piece_glyph(color: Color, piece: Piece) -> char {
    match (color, piece) {
        (Color::White, Piece::King) => '♔',
        (Color::White, Piece::Queen) => '♕',
        (Color::White, Piece::Rook) => '♖',
        (Color::White, Piece::Bishop) => '♗',
        (Color::White, Piece::Knight) => '♘',
        (Color::White, Piece::Pawn) => '♙',
        (Color::Black, Piece::King) => '♚',
        (Color::Black, Piece::Queen) => '♛',
        (Color::Black, Piece::Rook) => '♜',
        (Color::Black, Piece::Bishop) => '♝',
        (Color::Black, Piece::Knight) => '♞',
        (Color::Black, Piece::Pawn) => '♟',
    }
}

/// Square shown at draw index `i` (0..64).
pub fn square_at(i: usize, flipped: bool) -> Square {
    let (file, rank) = if flipped {
        (7 - i % 8, i / 8)
    } else {
        (i % 8, 7 - i / 8)
    };
    Square::new(File::index(file), Rank::index(rank))
}

pub fn shade_of(square: Square) -> Shade {
    if (square.file() as usize + square.rank() as usize) % 2 == 0 {
        Shade::Dark
    } else {
        Shade::Light
    }
}

pub fn render_cells(board: &Board) -> [Cell; 64] {
    render_cells_oriented(board, false)
}

/// Same as [`render_cells`], optionally seen from black's side.
pub fn render_cells_oriented(board: &Board, flipped: bool) -> [Cell; 64] {
    std::array::from_fn(|i| {
        let square = square_at(i, flipped);
        Cell {
            square,
            shade: shade_of(square),
            piece: piece_at(board, square),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_colours() {
        let cells = render_cells(&Board::default());
        assert_eq!(cells[0].square, Square::A8);
        assert_eq!(cells[63].square, Square::H1);
        assert_eq!(cells[56].square, Square::A1);
        assert_eq!(cells[56].shade, Shade::Dark);
        assert_eq!(cells[63].shade, Shade::Light);
        assert_eq!(cells[0].piece_code().as_deref(), Some("br"));
        assert_eq!(cells[60].piece_code().as_deref(), Some("wk"));
        assert_eq!(cells[60].glyph(), '♔');
    }

    #[test]
    fn flipped_starts_at_h1() {
        let cells = render_cells_oriented(&Board::default(), true);
        assert_eq!(cells[0].square, Square::H1);
        assert_eq!(cells[63].square, Square::A8);
    }
}
