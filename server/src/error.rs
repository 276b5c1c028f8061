use std::io;
use thiserror::Error;

/// Failures that end the server. Transient socket conditions never show up
/// here: callers filter them with [`is_transient`] first.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("input listener stopped: {0}")]
    Listener(#[from] tokio::task::JoinError),
    #[error("input listener exited before the match ended")]
    ListenerExited,
    #[error("mesh face {face} references a missing vertex")]
    InvalidMesh { face: usize },
}

/// True for socket errors that only mean "try again later".
pub fn is_transient(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::WouldBlock
}
