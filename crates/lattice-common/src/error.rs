use thiserror::Error;

/// Every failure the client surfaces to the user.
///
/// `Query` and `Command` display the upstream message verbatim.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Query(String),

    #[error("App {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Command(String),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
