//! Engine and analysis settings.
//!
//! Every binary flattens [`EngineArgs`] into its own clap parser and turns it
//! into an [`AnalysisConfig`] with [`EngineArgs::to_config`], which validates
//! the values before any engine is started.

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::error::{Error, Result};
use crate::eval::{LineAggregation, FRAGILITY_TOLERANCE};

/// Search depth sent with `go depth`.
pub const DEFAULT_DEPTH: u32 = 12;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AggregationArg {
    /// Depth iterations for MultiPV 1, multi-line statistics otherwise
    #[default]
    Auto,
    /// Every exact score line of the search is a candidate
    Depth,
    /// Latest score of each MultiPV line at the deepest depth
    Multipv,
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// UCI engine executable (looked up on PATH)
    #[arg(long, default_value = "stockfish")]
    pub engine: String,

    /// Extra command-line argument for the engine (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Search depth per position
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Number of principal variations the engine reports
    #[arg(long, default_value_t = 1)]
    pub multipv: u32,

    /// Engine search threads
    #[arg(long, default_value_t = 1)]
    pub threads: u32,

    /// Engine hash table size in MB
    #[arg(long, default_value_t = 16)]
    pub hash_mb: u32,

    /// Pawns within which a line counts as "as good as the best"
    #[arg(long, default_value_t = FRAGILITY_TOLERANCE)]
    pub tolerance: f64,

    /// How candidate lines are gathered from the engine output
    #[arg(long, value_enum, default_value_t = AggregationArg::Auto)]
    pub aggregation: AggregationArg,

    /// How long to wait for `uciok`/`readyok` after starting the engine
    #[arg(long, default_value_t = 5000)]
    pub handshake_timeout_ms: u64,
}

/// How to start and configure the engine process.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub path: String,
    pub args: Vec<String>,
    pub threads: u32,
    pub hash_mb: u32,
    pub multipv: u32,
    pub handshake_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: "stockfish".to_string(),
            args: Vec::new(),
            threads: 1,
            hash_mb: 16,
            multipv: 1,
            handshake_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub engine: EngineConfig,
    pub depth: u32,
    pub tolerance: f64,
    pub aggregation: LineAggregation,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            depth: DEFAULT_DEPTH,
            tolerance: FRAGILITY_TOLERANCE,
            aggregation: LineAggregation::DepthIterations,
        }
    }
}

impl AnalysisConfig {
    /// Reject settings no engine can honour.
    pub fn validate(&self) -> Result<()> {
        if self.engine.path.trim().is_empty() {
            return Err(Error::Config("engine path is empty".into()));
        }
        if self.depth == 0 {
            return Err(Error::Config("depth must be at least 1".into()));
        }
        if self.engine.multipv == 0 {
            return Err(Error::Config("multipv must be at least 1".into()));
        }
        if self.engine.threads == 0 {
            return Err(Error::Config("threads must be at least 1".into()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if self.engine.handshake_timeout.is_zero() {
            return Err(Error::Config("handshake timeout must be positive".into()));
        }
        Ok(())
    }
}

impl EngineArgs {
    pub fn to_config(&self) -> Result<AnalysisConfig> {
        let aggregation = match self.aggregation {
            AggregationArg::Auto => LineAggregation::for_multipv(self.multipv),
            AggregationArg::Depth => LineAggregation::DepthIterations,
            AggregationArg::Multipv => LineAggregation::MultiPv,
        };
        let config = AnalysisConfig {
            engine: EngineConfig {
                path: self.engine.clone(),
                args: self.engine_args.clone(),
                threads: self.threads,
                hash_mb: self.hash_mb,
                multipv: self.multipv,
                handshake_timeout: Duration::from_millis(self.handshake_timeout_ms),
            },
            depth: self.depth,
            tolerance: self.tolerance,
            aggregation,
        };
        config.validate()?;
        Ok(config)
    }
}
