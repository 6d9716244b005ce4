//! Domain error types.

/// Top-level error type for foliotrack.
///
/// Per-symbol quote failures are *not* represented here; they travel as
/// [`crate::domain::quote::ApiError`] values inside a reconcile outcome.
/// This enum covers batch-level failures with no sensible partial result.
#[derive(Debug, thiserror::Error)]
pub enum FoliotrackError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("invalid transaction: {reason}")]
    InvalidTransaction { reason: String },

    #[error("import error at record {record}: {reason}")]
    Import { record: usize, reason: String },

    #[error("quote source error: {reason}")]
    QuoteSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FoliotrackError> for std::process::ExitCode {
    fn from(err: &FoliotrackError) -> Self {
        let code: u8 = match err {
            FoliotrackError::Io(_) => 1,
            FoliotrackError::ConfigParse { .. }
            | FoliotrackError::ConfigMissing { .. }
            | FoliotrackError::ConfigInvalid { .. } => 2,
            FoliotrackError::Database { .. } | FoliotrackError::DatabaseQuery { .. } => 3,
            FoliotrackError::InvalidTransaction { .. } | FoliotrackError::Import { .. } => 4,
            FoliotrackError::QuoteSource { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
