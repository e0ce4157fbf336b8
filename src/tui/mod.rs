//! Terminal front end: state and actions (`app`), key mapping (`event`),
//! terminal lifecycle (`terminal`) and widgets (`view`).

pub mod app;
pub mod event;
pub mod terminal;
pub mod view;

pub use app::{Action, App, EngineStatus, ViewState};
pub use event::EventHandler;
pub use terminal::Tui;
