use thiserror::Error;

/// Hard failures of a selection call.
///
/// Soft outcomes (empty pool, unmet quotas, candidates without a score or
/// cost) are reported as data on the selection, never through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Contradictory or out-of-range parameters, rejected before any work.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal consistency failure. Always a programming error.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SelectionError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SelectionError::InvalidInput(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        SelectionError::InvariantViolation(msg.into())
    }

    /// `InvalidInput` can be fixed by the caller; an invariant violation cannot.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SelectionError::InvalidInput(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },

    #[error(transparent)]
    Invalid(#[from] SelectionError),
}

pub type Result<T> = std::result::Result<T, SelectionError>;
