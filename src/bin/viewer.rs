use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use chesslens::config::EngineArgs;
use chesslens::game::Game;
use chesslens::tui::{App, EventHandler, Tui};
use chesslens::uci::AnalysisSession;

#[derive(Parser, Debug)]
#[command(
    name = "viewer",
    about = "Step through the embedded game with an engine eval bar and fragility gauge"
)]
struct Args {
    #[command(flatten)]
    engine: EngineArgs,

    /// Run without starting an engine
    #[arg(long)]
    no_engine: bool,

    /// Show the board from black's side
    #[arg(long)]
    flip: bool,

    /// Ply to open the game at
    #[arg(long, default_value_t = 0)]
    start_ply: usize,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, default_value = "chesslens.log")]
    log_file: String,

    /// Log level for the log file
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run(app: &mut App) -> Result<()> {
    let mut tui = Tui::new()?;
    let events = EventHandler::default();
    app.init()?;
    while app.state.is_running {
        tui.draw(app)?;
        let action = events.next()?;
        app.dispatch(action)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file))?;
    let _ = WriteLogger::init(args.log_level, Config::default(), log_file);

    let game = Game::embedded()?;
    let config = args.engine.to_config()?;

    let mut app = if args.no_engine {
        App::offline(game, "disabled")
    } else {
        match AnalysisSession::start(config) {
            Ok(session) => App::new(game, session),
            Err(e) => {
                log::warn!("starting engine failed: {}", e);
                App::offline(game, e.to_string())
            }
        }
    };
    app.state.flipped = args.flip;
    for _ in 0..args.start_ply {
        if !app.state.cursor.forward() {
            break;
        }
    }

    let result = run(&mut app);
    Tui::restore_terminal()?;
    app.shutdown();
    result
}
