//! Request-correlated evaluation on top of an [`Engine`].
//!
//! UCI has no request ids, but an engine answers searches strictly in the
//! order they were started. The ledger keeps the in-flight searches in a FIFO:
//! every `info` line belongs to the oldest one and every `bestmove` closes it.
//! Only the most recently issued request is reported to the caller; anything
//! older is stale and dropped.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use cozy_chess::Board;
use log::debug;

use super::engine::Engine;
use super::protocol::{parse_line, EngineMessage, UciCommand};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::eval::{Evaluation, SearchTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub id: RequestId,
    pub evaluation: Evaluation,
    /// false when a newer request was issued after this one
    pub latest: bool,
}

#[derive(Debug, Default)]
pub struct RequestLedger {
    issued: u64,
    in_flight: VecDeque<(RequestId, SearchTracker)>,
    latest: Option<RequestId>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new search. The flag is true when an earlier search is
    /// still running and should be told to `stop`.
    pub fn issue(&mut self, tracker: SearchTracker) -> (RequestId, bool) {
        self.issued += 1;
        let id = RequestId(self.issued);
        let busy = !self.in_flight.is_empty();
        self.in_flight.push_back((id, tracker));
        self.latest = Some(id);
        (id, busy)
    }

    /// Feed one engine line; returns the search it completed, if any.
    pub fn feed(&mut self, line: &str) -> Option<Completed> {
        match parse_line(line) {
            EngineMessage::Info(info) => {
                if let Some((_, tracker)) = self.in_flight.front_mut() {
                    tracker.observe(&info);
                }
                None
            }
            EngineMessage::BestMove { mv, .. } => {
                let (id, tracker) = self.in_flight.pop_front()?;
                Some(Completed {
                    id,
                    evaluation: tracker.finish(mv),
                    latest: self.latest == Some(id),
                })
            }
            _ => None,
        }
    }

    pub fn latest(&self) -> Option<RequestId> {
        self.latest
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

pub struct AnalysisSession {
    engine: Engine,
    ledger: RequestLedger,
    config: AnalysisConfig,
}

impl AnalysisSession {
    pub fn start(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let engine = Engine::spawn(&config.engine)?;
        Ok(Self {
            engine,
            ledger: RequestLedger::new(),
            config,
        })
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.name()
    }

    pub fn is_searching(&self) -> bool {
        !self.ledger.is_idle()
    }

    /// Start evaluating `board`, superseding any earlier request.
    pub fn request(&mut self, board: &Board) -> Result<RequestId> {
        let tracker = SearchTracker::new(board, self.config.aggregation, self.config.tolerance);
        let (id, busy) = self.ledger.issue(tracker);
        if busy {
            self.engine.send(&UciCommand::Stop)?;
        }
        self.engine.send(&UciCommand::UciNewGame)?;
        self.engine.send(&UciCommand::Position {
            fen: board.to_string(),
        })?;
        self.engine.send(&UciCommand::GoDepth(self.config.depth))?;
        debug!("request {} for {}", id, board);
        Ok(id)
    }

    /// Drain whatever the engine has printed so far. Returns the evaluation
    /// of the latest request once it completes.
    ///
    /// An engine that exits right after its last `bestmove` still has that
    /// result returned; the exit is reported by the following call.
    pub fn poll(&mut self) -> Result<Option<(RequestId, Evaluation)>> {
        let mut done = None;
        loop {
            let line = match self.engine.try_line() {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(Error::EngineExited) if done.is_some() => {
                    debug!("engine exited after its last result");
                    break;
                }
                Err(e) => return Err(e),
            };
            if let Some(c) = self.ledger.feed(&line) {
                if c.latest {
                    done = Some((c.id, c.evaluation));
                } else {
                    debug!("dropping stale result of request {}", c.id);
                }
            }
        }
        Ok(done)
    }

    /// Evaluate `board` and block until the engine answers.
    pub fn evaluate(&mut self, board: &Board, timeout: Duration) -> Result<Evaluation> {
        let id = self.request(board)?;
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(line) = self.engine.wait_line(remaining)? else {
                return Err(Error::EngineTimeout(format!("go depth {}", self.config.depth)));
            };
            if let Some(c) = self.ledger.feed(&line) {
                if c.id == id {
                    return Ok(c.evaluation);
                }
                debug!("dropping stale result of request {}", c.id);
            }
        }
    }

    pub fn shutdown(mut self) {
        self.engine.quit();
    }
}
