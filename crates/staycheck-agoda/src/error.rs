use thiserror::Error;

/// Errors returned by the Agoda affiliate search client.
#[derive(Debug, Error)]
pub enum AgodaError {
    /// Site id or API key absent at construction time.
    #[error("API credentials not found: {0}")]
    MissingCredentials(&'static str),

    /// Search criteria failed validation; no request was sent.
    #[error("invalid search criteria: {0}")]
    Precondition(String),

    /// Network-level failure from the underlying HTTP client.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 5xx from the upstream service.
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// HTTP 4xx (or any other non-200, non-5xx status).
    #[error("HTTP {status}: {message}")]
    Client { status: u16, message: String },

    /// Well-formed response carrying an `error` object.
    #[error("Agoda API Error {id}: {message}")]
    Api { id: i64, message: String },

    /// The body was not valid JSON.
    #[error("invalid JSON response for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON in a shape the client does not understand.
    #[error("unexpected response shape: {0}")]
    Protocol(String),

    /// Every scheduled attempt failed with a retryable error.
    #[error("request failed after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: Box<AgodaError>,
    },
}

impl AgodaError {
    /// Numeric error code: the HTTP status for status errors, the API error
    /// id for API errors, `0` otherwise.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => i64::from(*status),
            Self::Api { id, .. } => *id,
            Self::Transport(e) => e.status().map_or(0, |s| i64::from(s.as_u16())),
            Self::RetryExhausted { last, .. } => last.code(),
            Self::MissingCredentials(_)
            | Self::Precondition(_)
            | Self::Decode { .. }
            | Self::Protocol(_) => 0,
        }
    }

    /// The originating HTTP status, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Client { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::RetryExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// `true` for errors raised before any network activity.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_) | Self::MissingCredentials(_))
    }
}
