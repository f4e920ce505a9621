//! Maps transport and protocol outcomes onto a closed set of verdicts.
//!
//! Only [`Verdict::RetryableTransport`] and [`Verdict::RetryableRateLimited`]
//! are retried. Every `Fatal*` verdict aborts the current call on first
//! occurrence.

use std::borrow::Cow;

use crate::error::AgodaError;

/// Classification of one completed transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// Timeout, connection failure, or a generic 5xx.
    RetryableTransport,
    /// 503 maintenance or 506 partial confirm.
    RetryableRateLimited,
    /// 4xx, malformed JSON, API error object, or invalid criteria.
    FatalClient,
    /// JSON that parsed but does not match the expected envelope.
    FatalProtocol,
}

impl Verdict {
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RetryableTransport | Self::RetryableRateLimited)
    }
}

/// Classifies a raw HTTP status code.
#[must_use]
pub fn classify_status(status: u16) -> Verdict {
    match status {
        200 => Verdict::Success,
        503 | 506 => Verdict::RetryableRateLimited,
        s if s >= 500 => Verdict::RetryableTransport,
        _ => Verdict::FatalClient,
    }
}

/// Classifies a client error.
#[must_use]
pub fn classify(err: &AgodaError) -> Verdict {
    match err {
        AgodaError::Transport(e) => {
            if let Some(status) = e.status() {
                classify_status(status.as_u16())
            } else if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
                // Includes connections dropped or reset mid-exchange.
                Verdict::RetryableTransport
            } else if e.is_decode() {
                Verdict::FatalProtocol
            } else {
                Verdict::FatalClient
            }
        }
        AgodaError::Server { status, .. } | AgodaError::Client { status, .. } => {
            classify_status(*status)
        }
        AgodaError::RetryExhausted { last, .. } => classify(last),
        AgodaError::Protocol(_) => Verdict::FatalProtocol,
        AgodaError::MissingCredentials(_)
        | AgodaError::Precondition(_)
        | AgodaError::Api { .. }
        | AgodaError::Decode { .. } => Verdict::FatalClient,
    }
}

/// Human-readable description of a non-200 status.
#[must_use]
pub fn status_message(status: u16) -> Cow<'static, str> {
    let known = match status {
        400 => "Bad Request - Malformed syntax",
        401 => "Unauthorized - Invalid API key or Site ID",
        403 => "Forbidden - Quota exceeded or terms violation",
        404 => "Not Found - Service or file not found",
        410 => "Gone - Request object is too old or no longer valid",
        500 => "Internal Server Error - Unrecoverable problem",
        503 => "Service Unavailable - Temporary maintenance",
        506 => "Partial Confirm - Contact customer service",
        other => return Cow::Owned(format!("HTTP {other} error")),
    };
    Cow::Borrowed(known)
}

/// Builds the typed error for a non-200 status.
pub(crate) fn status_error(status: u16) -> AgodaError {
    let message = status_message(status).into_owned();
    if status >= 500 {
        AgodaError::Server { status, message }
    } else {
        AgodaError::Client { status, message }
    }
}
