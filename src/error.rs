//! Error types for setup-time failures.
//!
//! Once a [`GeneticManager`](crate::evolution::GeneticManager) is running,
//! nothing returns an error: the generational loop handles degenerate cases
//! locally and keeps going.

/// Errors that can occur while loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

/// Errors raised by network construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Parameter shapes do not match the requested topology.
    TopologyMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopologyMismatch { expected, found } => write!(
                f,
                "Topology mismatch: expected layer sizes {:?}, found {:?}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for NetworkError {}
