use staycheck_agoda::AgodaError;
use thiserror::Error;

/// Failures that abort a whole verification.
///
/// Probe-level transport and API failures never surface here; they are
/// recorded on the attempt and probing continues.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid verification input: {0}")]
    InvalidInput(String),

    /// The client rejected a probe before sending it.
    #[error("probe rejected: {0}")]
    Search(#[source] AgodaError),

    #[error("no representable stay window in {0}")]
    DateOutOfRange(String),
}
