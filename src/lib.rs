// Game replay with engine evaluation and fragility gauge
pub mod board;
pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod report;
pub mod tui;
pub mod uci;

pub use error::{Error, Result};
