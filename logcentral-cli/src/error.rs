//! CLI-specific error types and exit code mapping

use logcentral_coalescer::CoalescerError;
use logcentral_core::error::LogCentralError;
use logcentral_ism::IsmError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// A flag or config value was rejected by the domain layer.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input data could not be decoded or conformed.
    #[error("input error: {0}")]
    Input(String),

    /// Writing merged output failed.
    #[error("output error: {0}")]
    Sink(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped error from logcentral-core.
    #[error("{0}")]
    Core(#[from] LogCentralError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                          |
    /// |------|----------------------------------|
    /// | 0    | Success                          |
    /// | 1    | General / command error          |
    /// | 2    | Configuration error              |
    /// | 3    | Invalid parameter                |
    /// | 4    | Corrupt or mismatched input data |
    /// | 10   | IO or output error               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LogCentralError::Config(_)) => 2,
            Self::InvalidParameter(_) => 3,
            Self::Input(_) => 4,
            Self::Io(_) | Self::Sink(_) | Self::Core(LogCentralError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<CoalescerError> for CliError {
    fn from(e: CoalescerError) -> Self {
        match e {
            CoalescerError::InvalidParameter { .. } => Self::InvalidParameter(e.to_string()),
            CoalescerError::Decode { .. } | CoalescerError::SchemaMismatch { .. } => {
                Self::Input(e.to_string())
            }
            CoalescerError::Sink { .. } => Self::Sink(e.to_string()),
            CoalescerError::Io(io) => Self::Io(io),
        }
    }
}

impl From<IsmError> for CliError {
    fn from(e: IsmError) -> Self {
        match e {
            IsmError::InvalidParameter { .. } => Self::InvalidParameter(e.to_string()),
            IsmError::InvalidStateTransition { .. } => Self::Command(e.to_string()),
        }
    }
}
