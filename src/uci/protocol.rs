//! The slice of the UCI protocol the viewer speaks: outgoing commands and
//! parsing of `id`, `uciok`, `readyok`, `info` and `bestmove` lines.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption { name: String, value: String },
    UciNewGame,
    Position { fen: String },
    GoDepth(u32),
    Stop,
    Quit,
}

impl fmt::Display for UciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciCommand::Uci => write!(f, "uci"),
            UciCommand::IsReady => write!(f, "isready"),
            UciCommand::SetOption { name, value } => {
                write!(f, "setoption name {} value {}", name, value)
            }
            UciCommand::UciNewGame => write!(f, "ucinewgame"),
            UciCommand::Position { fen } => write!(f, "position fen {}", fen),
            UciCommand::GoDepth(depth) => write!(f, "go depth {}", depth),
            UciCommand::Stop => write!(f, "stop"),
            UciCommand::Quit => write!(f, "quit"),
        }
    }
}

/// Engine score, from the perspective of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Cp(i32),
    /// Moves to mate; negative when the side to move gets mated.
    Mate(i32),
}

/// Pawns reported for any forced mate.
pub const MATE_PAWNS: f64 = 100.0;

impl Score {
    pub fn pawns(self) -> f64 {
        match self {
            Score::Cp(cp) => cp as f64 / 100.0,
            Score::Mate(n) if n > 0 => MATE_PAWNS,
            Score::Mate(_) => -MATE_PAWNS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bound {
    #[default]
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub multipv: Option<u32>,
    pub score: Option<Score>,
    pub bound: Bound,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time_ms: Option<u64>,
    pub pv: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    IdName(String),
    UciOk,
    ReadyOk,
    Info(InfoLine),
    BestMove {
        mv: Option<String>,
        ponder: Option<String>,
    },
    Other,
}

fn parse_info(rest: &[&str]) -> InfoLine {
    let mut info = InfoLine::default();
    let mut i = 0;
    let num = |i: usize| rest.get(i + 1).and_then(|t| t.parse::<u64>().ok());
    while i < rest.len() {
        match rest[i] {
            "depth" => {
                info.depth = num(i).map(|d| d as u32);
                i += 2;
            }
            "seldepth" => {
                info.seldepth = num(i).map(|d| d as u32);
                i += 2;
            }
            "multipv" => {
                info.multipv = num(i).map(|d| d as u32);
                i += 2;
            }
            "nodes" => {
                info.nodes = num(i);
                i += 2;
            }
            "nps" => {
                info.nps = num(i);
                i += 2;
            }
            "time" => {
                info.time_ms = num(i);
                i += 2;
            }
            "score" => {
                let value = rest.get(i + 2).and_then(|t| t.parse::<i32>().ok());
                info.score = match (rest.get(i + 1).copied(), value) {
                    (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                    (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                    _ => None,
                };
                i += 3;
                match rest.get(i).copied() {
                    Some("lowerbound") => {
                        info.bound = Bound::Lower;
                        i += 1;
                    }
                    Some("upperbound") => {
                        info.bound = Bound::Upper;
                        i += 1;
                    }
                    _ => {}
                }
            }
            "pv" => {
                info.pv = rest[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            // free text to the end of the line
            "string" => break,
            _ => i += 1,
        }
    }
    info
}

pub fn parse_line(line: &str) -> EngineMessage {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        ["uciok", ..] => EngineMessage::UciOk,
        ["readyok", ..] => EngineMessage::ReadyOk,
        ["id", "name", name @ ..] => EngineMessage::IdName(name.join(" ")),
        ["info", rest @ ..] => EngineMessage::Info(parse_info(rest)),
        ["bestmove", rest @ ..] => {
            let mv = rest
                .first()
                .filter(|m| **m != "(none)" && **m != "0000")
                .map(|m| m.to_string());
            let ponder = match rest {
                [_, "ponder", p, ..] => Some(p.to_string()),
                _ => None,
            };
            EngineMessage::BestMove { mv, ponder }
        }
        _ => EngineMessage::Other,
    }
}
