use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use cozy_chess::Color;
use log::info;
use serde::Serialize;

use chesslens::config::EngineArgs;
use chesslens::game::san::uci_line_to_san;
use chesslens::game::Game;
use chesslens::uci::AnalysisSession;

#[derive(Parser, Debug)]
#[command(
    name = "analyze-game",
    about = "Evaluate every position of the embedded game and write JSONL records"
)]
struct Args {
    #[command(flatten)]
    engine: EngineArgs,

    /// Write records here instead of stdout
    #[arg(long)]
    out: Option<String>,

    /// Give up on a position after this many milliseconds
    #[arg(long, default_value_t = 60_000)]
    per_move_timeout_ms: u64,
}

#[derive(Serialize, Debug)]
struct Record<'a> {
    ply: usize,
    san: Option<&'a str>,
    fen: String,
    stm: &'static str,
    score_cp: i32,
    mate: Option<i32>,
    best_pawns: f64,
    fragility: f64,
    lines: usize,
    depth: u32,
    bestmove: Option<String>,
    bestmove_san: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let game = Game::embedded()?;
    let config = args.engine.to_config()?;
    let timeout = Duration::from_millis(args.per_move_timeout_ms);

    let mut session = AnalysisSession::start(config).context("starting engine")?;
    info!(
        "analysing {} with {}",
        game.title(),
        session.engine_name().unwrap_or("engine")
    );

    let mut out: Box<dyn Write> = match args.out.as_deref() {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let t0 = Instant::now();
    for ply in 0..=game.len() {
        let board = game.position_at(ply);
        let eval = session
            .evaluate(&board, timeout)
            .with_context(|| format!("evaluating ply {}", ply))?;
        let bestmove_san = eval
            .bestmove
            .as_ref()
            .and_then(|m| uci_line_to_san(&board, std::slice::from_ref(m)).pop());
        let record = Record {
            ply,
            san: game.ply_before(ply).map(|p| p.san.as_str()),
            fen: board.to_string(),
            stm: match board.side_to_move() {
                Color::White => "w",
                Color::Black => "b",
            },
            score_cp: eval.score_cp(),
            mate: eval.mate,
            best_pawns: eval.best,
            fragility: eval.fragility,
            lines: eval.candidates.len(),
            depth: eval.depth,
            bestmove: eval.bestmove.clone(),
            bestmove_san,
        };
        writeln!(out, "{}", serde_json::to_string(&record)?)?;
        info!("ply {} {}", ply, eval.info_text());
    }
    out.flush()?;
    info!(
        "analysed {} positions in {:.1}s",
        game.len() + 1,
        t0.elapsed().as_secs_f64()
    );
    session.shutdown();
    Ok(())
}
