//! Standard algebraic notation on top of cozy-chess move generation.
//!
//! cozy-chess encodes castling as "king captures own rook" (`e1h1`), so both
//! the SAN writer and the UCI conversion special-case that shape.

use cozy_chess::{Board, Color, File, Move, Piece, Rank, Square};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("malformed SAN")]
    Malformed,
    #[error("no legal move matches")]
    NoMatch,
    #[error("more than one legal move matches")]
    Ambiguous,
}

pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut v = Vec::new();
    board.generate_moves(|ml| {
        for m in ml {
            v.push(m);
        }
        false
    });
    v
}

pub fn piece_at(board: &Board, sq: Square) -> Option<(Color, Piece)> {
    Some((board.color_on(sq)?, board.piece_on(sq)?))
}

fn file_char(sq: Square) -> char {
    char::from(b'a' + sq.file() as u8)
}

fn rank_char(sq: Square) -> char {
    char::from(b'1' + sq.rank() as u8)
}

fn is_kingside(mv: Move) -> bool {
    mv.to.file() as u8 > mv.from.file() as u8
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn piece_from_letter(c: char) -> Option<Piece> {
    match c {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        _ => None,
    }
}

pub fn parse_square(s: &str) -> Option<Square> {
    let b = s.as_bytes();
    if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
        return None;
    }
    Some(Square::new(
        File::index((b[0] - b'a') as usize),
        Rank::index((b[1] - b'1') as usize),
    ))
}

/// King moving onto a rook of its own colour.
pub fn is_castle(board: &Board, mv: Move) -> bool {
    match (piece_at(board, mv.from), piece_at(board, mv.to)) {
        (Some((c1, Piece::King)), Some((c2, Piece::Rook))) => c1 == c2,
        _ => false,
    }
}

pub fn is_capture(board: &Board, mv: Move) -> bool {
    if let Some((col_to, _)) = piece_at(board, mv.to) {
        return col_to != board.side_to_move();
    }
    // En passant: pawn changes file onto an empty square
    board.piece_on(mv.from) == Some(Piece::Pawn) && mv.from.file() != mv.to.file()
}

fn check_suffix(board: &Board, mv: Move) -> &'static str {
    let mut next = board.clone();
    next.play(mv);
    if next.checkers().is_empty() {
        return "";
    }
    let mut has_legal = false;
    next.generate_moves(|_| {
        has_legal = true;
        true
    });
    if has_legal {
        "+"
    } else {
        "#"
    }
}

/// SAN for a legal move, including check and mate markers.
pub fn san_for_move(board: &Board, mv: Move) -> String {
    let mut s = String::new();
    if is_castle(board, mv) {
        s.push_str(if is_kingside(mv) { "O-O" } else { "O-O-O" });
        s.push_str(check_suffix(board, mv));
        return s;
    }
    let piece = board.piece_on(mv.from).unwrap_or(Piece::Pawn);
    let capture = is_capture(board, mv);
    if piece == Piece::Pawn {
        if capture {
            s.push(file_char(mv.from));
        }
    } else {
        s.push(piece_letter(piece));
        let rivals: Vec<Move> = legal_moves(board)
            .into_iter()
            .filter(|m| {
                m.to == mv.to
                    && m.from != mv.from
                    && board.piece_on(m.from) == Some(piece)
                    && !is_castle(board, *m)
            })
            .collect();
        if !rivals.is_empty() {
            let file_shared = rivals.iter().any(|m| m.from.file() == mv.from.file());
            let rank_shared = rivals.iter().any(|m| m.from.rank() == mv.from.rank());
            if !file_shared {
                s.push(file_char(mv.from));
            } else if !rank_shared {
                s.push(rank_char(mv.from));
            } else {
                s.push(file_char(mv.from));
                s.push(rank_char(mv.from));
            }
        }
    }
    if capture {
        s.push('x');
    }
    s.push_str(&format!("{}", mv.to));
    if let Some(promo) = mv.promotion {
        s.push('=');
        s.push(piece_letter(promo));
    }
    s.push_str(check_suffix(board, mv));
    s
}

/// Resolve a SAN token against the legal moves of `board`.
///
/// Check markers and annotation glyphs (`+ # ! ?`) are ignored; `0-0` is
/// accepted for castling.
pub fn parse_san(board: &Board, san: &str) -> Result<Move, SanError> {
    let text = san.trim().trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'));
    if text.is_empty() {
        return Err(SanError::Malformed);
    }
    let moves = legal_moves(board);

    let castle_side = match text {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    };
    if let Some(kingside) = castle_side {
        let found: Vec<Move> = moves
            .into_iter()
            .filter(|m| is_castle(board, *m) && is_kingside(*m) == kingside)
            .collect();
        return single(found);
    }

    let mut chars: Vec<char> = text.chars().filter(|&c| c != 'x' && c != ':').collect();
    let piece = match chars.first().copied().and_then(piece_from_letter) {
        Some(p) => {
            chars.remove(0);
            p
        }
        None => Piece::Pawn,
    };

    let mut promotion = None;
    if piece == Piece::Pawn {
        if let Some(&last) = chars.last() {
            if let Some(p) = piece_from_letter(last.to_ascii_uppercase()) {
                if p != Piece::King && chars.len() > 2 {
                    promotion = Some(p);
                    chars.pop();
                    if chars.last() == Some(&'=') {
                        chars.pop();
                    }
                }
            }
        }
    }

    if chars.len() < 2 {
        return Err(SanError::Malformed);
    }
    let dest: String = chars[chars.len() - 2..].iter().collect();
    let to = parse_square(&dest).ok_or(SanError::Malformed)?;
    let mut from_file = None;
    let mut from_rank = None;
    for &c in &chars[..chars.len() - 2] {
        match c {
            'a'..='h' => from_file = Some(c as u8 - b'a'),
            '1'..='8' => from_rank = Some(c as u8 - b'1'),
            _ => return Err(SanError::Malformed),
        }
    }

    let found: Vec<Move> = moves
        .into_iter()
        .filter(|m| {
            m.to == to
                && m.promotion == promotion
                && board.piece_on(m.from) == Some(piece)
                && !is_castle(board, *m)
                && from_file.map_or(true, |f| m.from.file() as u8 == f)
                && from_rank.map_or(true, |r| m.from.rank() as u8 == r)
        })
        .collect();
    single(found)
}

fn single(found: Vec<Move>) -> Result<Move, SanError> {
    match found.as_slice() {
        [m] => Ok(*m),
        [] => Err(SanError::NoMatch),
        _ => Err(SanError::Ambiguous),
    }
}

/// UCI string for a move, writing castling the standard way (`e1g1`).
pub fn move_to_uci(board: &Board, mv: Move) -> String {
    if is_castle(board, mv) {
        let file = if is_kingside(mv) { File::G } else { File::C };
        let to = Square::new(file, mv.from.rank());
        return format!("{}{}", mv.from, to);
    }
    format!("{}", mv)
}

/// Find the legal move named by a UCI string; accepts both `e1g1` and the
/// king-takes-rook `e1h1` form for castling.
pub fn find_move_uci(board: &Board, uci: &str) -> Option<Move> {
    legal_moves(board)
        .into_iter()
        .find(|&m| move_to_uci(board, m) == uci || format!("{}", m) == uci)
}

/// SAN for each move of a UCI line, stopping at the first one that is not legal.
pub fn uci_line_to_san(board: &Board, line: &[String]) -> Vec<String> {
    let mut cur = board.clone();
    let mut out = Vec::with_capacity(line.len());
    for uci in line {
        let Some(mv) = find_move_uci(&cur, uci) else {
            break;
        };
        out.push(san_for_move(&cur, mv));
        cur.play(mv);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castling_uses_standard_uci() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let board = Board::from_fen(fen, false).unwrap();
        let short = parse_san(&board, "O-O").unwrap();
        assert_eq!(move_to_uci(&board, short), "e1g1");
        let long = parse_san(&board, "0-0-0").unwrap();
        assert_eq!(move_to_uci(&board, long), "e1c1");
        assert_eq!(find_move_uci(&board, "e1g1"), Some(short));
        assert_eq!(san_for_move(&board, long), "O-O-O");
    }

    #[test]
    fn promotion_forms() {
        let board = Board::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1", false).unwrap();
        let q = parse_san(&board, "a8=Q").unwrap();
        assert_eq!(q.promotion, Some(Piece::Queen));
        assert_eq!(parse_san(&board, "a8N").unwrap().promotion, Some(Piece::Knight));
        assert_eq!(parse_san(&board, "a8"), Err(SanError::NoMatch));
        assert_eq!(san_for_move(&board, q), "a8=Q");
    }

    #[test]
    fn en_passant_is_a_capture() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", false).unwrap();
        let mv = parse_san(&board, "exd6").unwrap();
        assert!(is_capture(&board, mv));
        assert_eq!(san_for_move(&board, mv), "exd6");
    }

    #[test]
    fn ambiguous_knight_needs_file() {
        let board = Board::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1", false).unwrap();
        assert_eq!(parse_san(&board, "Nd2"), Err(SanError::Ambiguous));
        let mv = parse_san(&board, "Nbd2").unwrap();
        assert_eq!(san_for_move(&board, mv), "Nbd2");
    }

    #[test]
    fn garbage_is_malformed() {
        let board = Board::default();
        assert_eq!(parse_san(&board, "Zz9"), Err(SanError::Malformed));
        assert_eq!(parse_san(&board, ""), Err(SanError::Malformed));
    }
}
