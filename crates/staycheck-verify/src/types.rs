//! Verification records handed to reporting collaborators.

use serde::{Deserialize, Serialize};

use crate::calendar::{StayWindow, YearMonth};

/// Message recorded for links whose property id could not be resolved.
pub const UNRESOLVED_PROPERTY_MESSAGE: &str = "Could not extract property ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AvailabilityStatus {
    Available,
    Unavailable,
    Error,
}

/// What one probe observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Hit,
    Empty,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationAttempt {
    /// 1-based position in the probe schedule.
    pub attempt: u32,
    pub month: YearMonth,
    pub window: StayWindow,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResult {
    /// `None` for links whose id never resolved.
    pub property_id: Option<i64>,
    pub status: AvailabilityStatus,
    pub hotel_name: Option<String>,
    pub daily_rate: Option<f64>,
    pub currency: String,
    pub successful_dates: Option<StayWindow>,
    /// Every probe in the order it was made, kept on success too.
    pub attempts: Vec<VerificationAttempt>,
    /// Last probe error, only when nothing hit.
    pub error_message: Option<String>,
}

impl VerificationResult {
    /// The synthesized result for an unresolvable link; no probing happens.
    #[must_use]
    pub fn unresolved(currency: &str) -> Self {
        Self {
            property_id: None,
            status: AvailabilityStatus::Error,
            hotel_name: None,
            daily_rate: None,
            currency: currency.to_owned(),
            successful_dates: None,
            attempts: Vec::new(),
            error_message: Some(UNRESOLVED_PROPERTY_MESSAGE.to_owned()),
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Available
    }

    /// Tried windows rendered as `"YYYY-MM-DD to YYYY-MM-DD (N nights)"`.
    #[must_use]
    pub fn dates_tried(&self) -> Vec<String> {
        self.attempts.iter().map(|a| a.window.to_string()).collect()
    }
}

/// A `(display_text, raw_url)` pair plus its resolved property id, as
/// produced by the link-discovery collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub display_text: String,
    pub raw_url: String,
    #[serde(default)]
    pub property_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkVerification {
    pub display_text: String,
    pub raw_url: String,
    #[serde(flatten)]
    pub result: VerificationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    pub errors: usize,
    pub healthy: bool,
}

impl VerificationSummary {
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a VerificationResult>,
    {
        let mut summary = Self::default();
        for r in results {
            summary.total += 1;
            match r.status {
                AvailabilityStatus::Available => summary.available += 1,
                AvailabilityStatus::Unavailable => summary.unavailable += 1,
                AvailabilityStatus::Error => summary.errors += 1,
            }
        }
        summary.healthy = summary.unavailable == 0 && summary.errors == 0;
        summary
    }

    /// Number of rows that are not `Available`.
    #[must_use]
    pub fn issues(&self) -> usize {
        self.unavailable + self.errors
    }
}
