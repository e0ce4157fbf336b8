//! Summaries of an `analyze_game` JSONL file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Rec {
    pub ply: usize,
    #[serde(default)]
    pub san: Option<String>,
    #[serde(default)]
    pub fen: String,
    #[serde(default)]
    pub score_cp: i32,
    #[serde(default)]
    pub mate: Option<i32>,
    #[serde(default)]
    pub fragility: f64,
    #[serde(default)]
    pub lines: usize,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub bestmove_san: Option<String>,
}

/// Parse JSONL records, skipping blank and malformed lines.
pub fn parse_jsonl<R: BufRead>(reader: R) -> Vec<Rec> {
    let mut out = Vec::new();
    for line in reader.lines().map_while(|l| l.ok()) {
        let l = line.trim();
        if l.is_empty() {
            continue;
        }
        match serde_json::from_str::<Rec>(l) {
            Ok(r) => out.push(r),
            Err(e) => log::debug!("skipping line: {}", e),
        }
    }
    out.sort_by_key(|r| r.ply);
    out
}

pub fn load_jsonl(path: &Path) -> Result<Vec<Rec>> {
    let f = File::open(path)?;
    Ok(parse_jsonl(BufReader::new(f)))
}

/// Positions with the fewest lines close to the best one. Positions the
/// engine reported no lines for are left out.
pub fn sharpest(recs: &[Rec], n: usize) -> Vec<&Rec> {
    let mut v: Vec<&Rec> = recs.iter().filter(|r| r.lines > 0).collect();
    v.sort_by(|a, b| a.fragility.total_cmp(&b.fragility).then(a.ply.cmp(&b.ply)));
    v.truncate(n);
    v
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swing<'a> {
    pub before: &'a Rec,
    pub after: &'a Rec,
    /// Change in white-perspective centipawns
    pub delta_cp: i32,
}

/// Largest evaluation changes between consecutive plies.
pub fn largest_swings(recs: &[Rec], n: usize) -> Vec<Swing<'_>> {
    let mut v: Vec<Swing> = recs
        .windows(2)
        .filter(|w| w[1].ply == w[0].ply + 1)
        .map(|w| Swing {
            before: &w[0],
            after: &w[1],
            delta_cp: w[1].score_cp - w[0].score_cp,
        })
        .collect();
    v.sort_by(|a, b| {
        b.delta_cp
            .abs()
            .cmp(&a.delta_cp.abs())
            .then(a.after.ply.cmp(&b.after.ply))
    });
    v.truncate(n);
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"ply":0,"san":null,"fen":"a","score_cp":30,"fragility":1.0,"lines":3,"depth":12}
not json
{"ply":2,"san":"e5","fen":"c","score_cp":-250,"fragility":0.25,"lines":4,"depth":12}
{"ply":1,"san":"e4","fen":"b","score_cp":35,"fragility":0.5,"lines":4,"depth":12}

{"ply":3,"san":"Nf3","fen":"d","score_cp":-240,"fragility":0.0,"lines":0,"depth":0}
"#;

    #[test]
    fn skips_bad_lines_and_orders_by_ply() {
        let recs = parse_jsonl(SAMPLE.as_bytes());
        let plies: Vec<usize> = recs.iter().map(|r| r.ply).collect();
        assert_eq!(plies, vec![0, 1, 2, 3]);
    }

    #[test]
    fn sharpest_ignores_empty_searches() {
        let recs = parse_jsonl(SAMPLE.as_bytes());
        let s = sharpest(&recs, 2);
        assert_eq!(s.iter().map(|r| r.ply).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn biggest_swing_first() {
        let recs = parse_jsonl(SAMPLE.as_bytes());
        let s = largest_swings(&recs, 1);
        assert_eq!(s[0].after.san.as_deref(), Some("e5"));
        assert_eq!(s[0].delta_cp, -285);
    }
}
