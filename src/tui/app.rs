use cozy_chess::Board;
use log::{info, warn};

use crate::error::Result;
use crate::eval::Evaluation;
use crate::game::{Cursor, Game};
use crate::uci::{AnalysisSession, RequestId};

/// Represents actions that can be dispatched to the App.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Next,
    Prev,
    First,
    Last,
    Flip,
    ToggleHelp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Searching(RequestId),
    Unavailable(String),
}

/// Everything the widgets read. Updated only through the functions below.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub cursor: Cursor,
    pub flipped: bool,
    /// Last completed evaluation; may belong to an earlier position while
    /// `pending` is set.
    pub evaluation: Option<Evaluation>,
    pub evaluated_ply: Option<usize>,
    pub pending: Option<RequestId>,
    pub engine: EngineStatus,
    pub engine_name: Option<String>,
    pub show_help: bool,
    pub is_running: bool,
}

impl ViewState {
    pub fn new(cursor: Cursor) -> Self {
        Self {
            cursor,
            flipped: false,
            evaluation: None,
            evaluated_ply: None,
            pending: None,
            engine: EngineStatus::Idle,
            engine_name: None,
            show_help: false,
            is_running: true,
        }
    }

    /// True when the shown evaluation belongs to the shown position.
    pub fn evaluation_is_current(&self) -> bool {
        self.evaluated_ply == Some(self.cursor.index()) && self.pending.is_none()
    }
}

/// Move the cursor; false when it was already at the requested bound.
pub fn step(state: &mut ViewState, step: Step) -> bool {
    match step {
        Step::Forward => state.cursor.forward(),
        Step::Back => state.cursor.back(),
        Step::Start => state.cursor.to_start(),
        Step::End => state.cursor.to_end(),
    }
}

/// Record a finished search. Results for anything but the pending request
/// are ignored.
pub fn apply_evaluation(state: &mut ViewState, id: RequestId, evaluation: Evaluation) -> bool {
    if state.pending != Some(id) {
        return false;
    }
    state.evaluation = Some(evaluation);
    state.evaluated_ply = Some(state.cursor.index());
    state.pending = None;
    if let EngineStatus::Searching(_) = state.engine {
        state.engine = EngineStatus::Idle;
    }
    true
}

pub struct App {
    pub game: Game,
    pub state: ViewState,
    session: Option<AnalysisSession>,
}

impl App {
    pub fn new(game: Game, session: AnalysisSession) -> Self {
        let mut state = ViewState::new(game.cursor());
        state.engine_name = session.engine_name().map(str::to_string);
        Self {
            game,
            state,
            session: Some(session),
        }
    }

    /// Viewer without an engine; the bars stay empty.
    pub fn offline(game: Game, reason: impl Into<String>) -> Self {
        let mut state = ViewState::new(game.cursor());
        state.engine = EngineStatus::Unavailable(reason.into());
        Self {
            game,
            state,
            session: None,
        }
    }

    pub fn init(&mut self) -> Result<()> {
        info!("replaying {} ({} plies)", self.game.title(), self.game.len());
        self.request_current();
        Ok(())
    }

    pub fn board(&self) -> Board {
        self.game.position_at(self.state.cursor.index())
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let moved = match action {
            Action::Quit => {
                self.state.is_running = false;
                false
            }
            Action::Tick => false,
            Action::Next => step(&mut self.state, Step::Forward),
            Action::Prev => step(&mut self.state, Step::Back),
            Action::First => step(&mut self.state, Step::Start),
            Action::Last => step(&mut self.state, Step::End),
            Action::Flip => {
                self.state.flipped = !self.state.flipped;
                false
            }
            Action::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
                false
            }
        };
        if moved {
            self.request_current();
        }
        self.pump_engine();
        Ok(())
    }

    fn request_current(&mut self) {
        let board = self.board();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.request(&board) {
            Ok(id) => {
                self.state.pending = Some(id);
                self.state.engine = EngineStatus::Searching(id);
            }
            Err(e) => self.engine_failed(e.to_string()),
        }
    }

    /// Pick up any finished search without blocking.
    pub fn pump_engine(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.poll() {
            Ok(Some((id, evaluation))) => {
                if !apply_evaluation(&mut self.state, id, evaluation) {
                    warn!("ignoring evaluation for request {}", id);
                }
            }
            Ok(None) => {}
            Err(e) => self.engine_failed(e.to_string()),
        }
    }

    fn engine_failed(&mut self, reason: String) {
        warn!("engine unavailable: {}", reason);
        self.state.pending = None;
        self.state.engine = EngineStatus::Unavailable(reason);
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            session.shutdown();
        }
    }
}
