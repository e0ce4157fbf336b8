use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("PGN error: {0}")]
    Pgn(String),

    #[error("illegal move {san} at ply {ply} (position {fen})")]
    IllegalSan { ply: usize, san: String, fen: String },

    #[error("ambiguous move {san} at ply {ply} (position {fen})")]
    AmbiguousSan { ply: usize, san: String, fen: String },

    #[error("invalid FEN: {0}")]
    Fen(String),

    #[error("failed to start engine `{path}`: {source}")]
    EngineSpawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine exited")]
    EngineExited,

    #[error("engine did not answer `{0}` in time")]
    EngineTimeout(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
