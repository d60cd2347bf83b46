//! Error types for the grid-world RL library

use thiserror::Error;

/// Core error type for grid-world RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Not enough free cells to place the requested items
    #[error("Infeasible placement: requested {requested} cells, only {available} free")]
    InfeasiblePlacement {
        /// Number of cells requested
        requested: usize,
        /// Number of free cells available
        available: usize,
    },

    /// Configuration value out of its recognized range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// State that does not belong to the environment
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A non-terminal state has no derived policy action
    #[error("No policy action for non-terminal state {0}")]
    MissingPolicyAction(String),

    /// Operation requested in the wrong solver phase
    #[error("Solver phase error: {0}")]
    SolverPhase(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for grid-world RL operations
pub type Result<T> = std::result::Result<T, RLError>;
