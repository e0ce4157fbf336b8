pub mod engine;
pub mod protocol;
pub mod session;

pub use engine::Engine;
pub use protocol::{parse_line, Bound, EngineMessage, InfoLine, Score, UciCommand};
pub use session::{AnalysisSession, Completed, RequestId, RequestLedger};
