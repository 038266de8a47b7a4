use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoleFlowError {
    #[error("Negative capacity for role '{category}': {capacity}")]
    NegativeCapacity { category: String, capacity: i64 },

    #[error("Duplicate player: {agent}")]
    DuplicateAgent { agent: String },

    #[error("Duplicate role: {category}")]
    DuplicateCategory { category: String },

    #[error("Player '{agent}' lists role '{category}' more than once")]
    DuplicatePreference { agent: String, category: String },

    #[error("No feasible assignment: {routed} of {required} positions could be filled")]
    Infeasible { required: i64, routed: i64 },

    #[error("Solver returned an invalid flow: {reason}")]
    InvalidFlow { reason: String },

    #[error("Config key not found: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Broad classification of a [`RoleFlowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input detected while building the network.
    Config,
    /// The network admits no flow of the required value.
    Infeasible,
    /// Reading or parsing an input file failed.
    Io,
    /// A solver broke its contract.
    Internal,
}

pub type Result<T> = std::result::Result<T, RoleFlowError>;

impl RoleFlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NegativeCapacity { .. }
            | Self::DuplicateAgent { .. }
            | Self::DuplicateCategory { .. }
            | Self::DuplicatePreference { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => ErrorKind::Config,
            Self::Infeasible { .. } => ErrorKind::Infeasible,
            Self::InvalidFlow { .. } => ErrorKind::Internal,
            Self::ConfigParse { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::TomlSer(_)
            | Self::TomlDe(_) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Config => 2,
            ErrorKind::Infeasible => 3,
            ErrorKind::Io => 4,
            ErrorKind::Internal => 1,
        }
    }
}
