use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use chesslens::report::{largest_swings, load_jsonl, sharpest};

#[derive(Parser, Debug)]
#[command(
    name = "fragility-report",
    about = "Summarise an analyze-game JSONL file: sharpest positions and biggest swings"
)]
struct Args {
    /// JSONL written by analyze-game
    #[arg(long)]
    jsonl: PathBuf,

    /// Rows per section
    #[arg(long, default_value_t = 5)]
    top: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let recs = load_jsonl(&args.jsonl)?;
    if recs.is_empty() {
        eprintln!("no records parsed");
        return Ok(());
    }

    println!("sharpest positions (fewest lines near the best):");
    for r in sharpest(&recs, args.top) {
        println!(
            "ply={} after={} fragility={:.0}% lines={} score_cp={} best={} fen={}",
            r.ply,
            r.san.as_deref().unwrap_or("-"),
            r.fragility * 100.0,
            r.lines,
            r.score_cp,
            r.bestmove_san.as_deref().unwrap_or("-"),
            r.fen
        );
    }

    println!("largest evaluation swings:");
    let swings = largest_swings(&recs, args.top);
    if swings.is_empty() {
        println!("(none)");
    }
    for s in swings {
        println!(
            "ply={} move={} {:+} cp ({} -> {}) depth={}",
            s.after.ply,
            s.after.san.as_deref().unwrap_or("-"),
            s.delta_cp,
            s.before.score_cp,
            s.after.score_cp,
            s.after.depth
        );
    }
    Ok(())
}
