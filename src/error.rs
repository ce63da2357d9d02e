use std::io;

/// Errors surfaced at the crate's shape-checked API boundary.
///
/// Misuse of the low-level hot path (`Layer::forward`, `Vector` arithmetic, ...) panics
/// instead; see the crate docs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
