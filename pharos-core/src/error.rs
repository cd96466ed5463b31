use thiserror::Error;

/// All errors produced by pharos-core.
#[derive(Debug, Error)]
pub enum PharosError {
    #[error("sink write error: {0}")]
    SinkWrite(String),

    #[error("an emission is already running")]
    AlreadyRunning,

    #[error("no emission is running")]
    NotRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PharosError>;
