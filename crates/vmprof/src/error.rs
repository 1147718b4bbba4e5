use thiserror::Error;

/// Rejected process-level profiler configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("sample buffer capacity must be positive")]
    ZeroCapacity,
    #[error("maximum stack depth must be positive")]
    ZeroStackDepth,
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum CodeTableError {
    #[error("code range {start:#x}..{end:#x} is empty")]
    EmptyRange { start: usize, end: usize },
    #[error("code range {start:#x}..{end:#x} overlaps an existing code object")]
    Overlap { start: usize, end: usize },
    #[error("unknown function id {0}")]
    UnknownFunction(usize),
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown tag policy '{0}' (expected None, UserOnly, VMOnly, UserVM or VMUser)")]
pub struct ParseTagPolicyError(pub String);
