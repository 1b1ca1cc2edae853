//! Domain error types.
//!
//! Three core kinds: `InsufficientData` (series shorter than the required
//! lookback — fails fast rather than degrading into a near-empty result),
//! `InvalidParameters` (malformed strategy/scan parameters), and
//! `Computation` (unexpected numeric failure such as NaN propagation).
//!
//! Indicator functions never return these — they yield an empty series on
//! short input and leave the length check to the caller.

/// Top-level error type for stratrader.
#[derive(Debug, thiserror::Error)]
pub enum StratraderError {
    #[error("insufficient data: have {have} bars, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    #[error("computation error: {reason}")]
    Computation { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("data access error: {reason}")]
    DataAccess { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StratraderError> for std::process::ExitCode {
    fn from(err: &StratraderError) -> Self {
        let code: u8 = match err {
            StratraderError::Io(_) => 1,
            StratraderError::ConfigParse { .. }
            | StratraderError::ConfigMissing { .. }
            | StratraderError::ConfigInvalid { .. } => 2,
            StratraderError::DataAccess { .. } => 3,
            StratraderError::InvalidParameters { .. } => 4,
            StratraderError::NoData { .. } | StratraderError::InsufficientData { .. } => 5,
            StratraderError::Computation { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
