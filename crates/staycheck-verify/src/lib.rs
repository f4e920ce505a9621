//! Availability verification for affiliate-linked properties.
//!
//! Separates two retry layers: the client retries one request on transient
//! failures, and [`AvailabilityVerifier`] probes several date windows,
//! treating each exhausted request as one failed probe.

pub mod calendar;
pub mod error;
pub mod types;
pub mod verifier;

pub use calendar::{anchor_month, DayPicker, RandomDayPicker, StayLength, StayWindow, YearMonth};
pub use error::VerifyError;
pub use types::{
    AttemptOutcome, AvailabilityStatus, LinkCandidate, LinkVerification, VerificationAttempt,
    VerificationResult, VerificationSummary, UNRESOLVED_PROPERTY_MESSAGE,
};
pub use verifier::{max_attempts, probe_schedule, AvailabilityVerifier, ProbeSlot};
