use thiserror::Error;

/// Errors raised by game-rule collaborators.
///
/// These are contract violations: the search engine never masks them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Cannot take an action in a terminal state")]
    TerminalState,

    #[error("Utility queried on a non-terminal state")]
    NotTerminal,

    #[error("Utility vector has {found} entries, expected {expected}")]
    UtilityShape { expected: usize, found: usize },

    #[error("Utility index {index} out of range for {len} players")]
    UtilityIndex { index: usize, len: usize },

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;
