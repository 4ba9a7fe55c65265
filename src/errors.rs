// ⚠️ Error Taxonomy
// Every failure here is recoverable by the user retrying; nothing is fatal.

use crate::schema::ValidationError;
use thiserror::Error;

/// Errors surfaced by dashboard operations and remote calls.
#[derive(Debug, Error)]
pub enum AppError {
    /// Form input failed schema constraints (shown inline per field)
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A category with the same label (case-insensitive) already exists
    #[error("a category named \"{0}\" already exists")]
    DuplicateCategory(String),

    /// The triggering control is still waiting on a previous call
    #[error("{0} already in progress")]
    Busy(&'static str),

    /// A derived amount fell outside the representable range
    #[error("{0} is out of range")]
    Overflow(&'static str),

    /// The authentication service rejected the credentials
    #[error("invalid credentials")]
    Unauthorized,

    /// The authentication service issued a token unfit for a cookie
    #[error("authentication service returned a malformed token")]
    MalformedToken,

    /// The remote service could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with a non-success status
    #[error("remote service returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Convenience for a single-field validation failure
    pub fn invalid(field: &str, message: &str) -> Self {
        AppError::Validation(vec![ValidationError::new(field, message)])
    }

    /// True for failures caused by the outside world rather than user input
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::Network(_)
                | AppError::Remote { .. }
                | AppError::Unauthorized
                | AppError::MalformedToken
        )
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AppError::Network(err.to_string()),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type AppResult<T> = Result<T, AppError>;
