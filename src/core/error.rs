use thiserror::Error;

/// Errors surfaced at the adapter boundary.
///
/// The translation core itself never fails: unsupported field types and
/// unsupported value kinds degrade to "no effect on the data model". This
/// type exists for the harness boundary, where configuration problems and
/// source-read failures are reported.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration was rejected during validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// A measurement source reported a failure while collecting
    #[error("Measurement source error: {0}")]
    Source(String),

    /// A measurement was structurally invalid (e.g. empty name)
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new source error
    pub fn source<S: Into<String>>(msg: S) -> Self {
        Self::Source(msg.into())
    }

    /// Creates a new invalid-measurement error
    pub fn invalid_measurement<S: Into<String>>(msg: S) -> Self {
        Self::InvalidMeasurement(msg.into())
    }

    /// Returns the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Source(_) => "source",
            Self::InvalidMeasurement(_) => "validation",
        }
    }
}
