use thiserror::Error;

/** errors reported by the coloring library.
Every variant is a caller-input error, detected before any search work begins.
*/
#[derive(Debug, Error)]
pub enum ColoringError {
    /// the graph is empty or its adjacency is malformed
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// the coloring does not match the graph or contains conflicts
    #[error("invalid coloring: {0}")]
    InvalidColoring(String),

    /// unknown strategy selector
    #[error("unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    /// malformed instance file
    #[error("parse error: {0}")]
    Parse(String),

    /// file system error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// malformed JSON configuration
    #[error(transparent)]
    Config(#[from] serde_json::Error),
}

/// result type of the library
pub type Result<T> = std::result::Result<T, ColoringError>;
