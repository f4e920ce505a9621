//! Multi-window availability probing.
//!
//! A property is probed in two phases over the three months following the
//! anchor month:
//!
//! | Attempts | Stay     | Months                  |
//! |----------|----------|-------------------------|
//! | 1–3      | 2 nights | anchor, anchor+1, +2    |
//! | 4–6      | 1 night  | anchor, anchor+1, +2    |
//!
//! The first non-empty result resolves the property as available. Empty
//! results and transport/API failures move on to the next probe; only a
//! rejected (invalid) probe aborts the verification.

use chrono::NaiveDate;
use staycheck_agoda::{validate_currency, HotelSearch, HotelSearchCriteria, Occupancy, StayRequest};

use crate::calendar::{anchor_month, pick_window, DayPicker, RandomDayPicker, StayLength, YearMonth};
use crate::error::VerifyError;
use crate::types::{
    AttemptOutcome, AvailabilityStatus, LinkCandidate, LinkVerification, VerificationAttempt,
    VerificationResult,
};

/// Months sampled per phase.
pub const MONTHS_PER_PHASE: u32 = 3;
/// Phases in probing order.
pub const PHASES: [StayLength; 2] = [StayLength::TwoNights, StayLength::OneNight];

/// One scheduled probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSlot {
    pub attempt: u32,
    pub stay: StayLength,
    pub month: YearMonth,
}

/// The fixed six-probe schedule starting at `anchor`.
pub fn probe_schedule(anchor: YearMonth) -> impl Iterator<Item = ProbeSlot> {
    PHASES
        .into_iter()
        .flat_map(move |stay| (0..MONTHS_PER_PHASE).map(move |offset| (stay, anchor.plus(offset))))
        .zip(1u32..)
        .map(|((stay, month), attempt)| ProbeSlot {
            attempt,
            stay,
            month,
        })
}

/// Total probes per property.
#[must_use]
pub fn max_attempts() -> u32 {
    MONTHS_PER_PHASE * u32::try_from(PHASES.len()).unwrap_or(u32::MAX)
}

/// Decides whether a property is still bookable.
///
/// Owns the search backend and the day source. Properties are verified one
/// at a time; a verification issues at most six searches.
pub struct AvailabilityVerifier<S, D = RandomDayPicker> {
    search: S,
    days: D,
}

impl<S: HotelSearch> AvailabilityVerifier<S> {
    /// Verifier drawing check-in days at random.
    pub fn new(search: S) -> Self {
        Self::with_day_picker(search, RandomDayPicker::new())
    }
}

impl<S: HotelSearch, D: DayPicker> AvailabilityVerifier<S, D> {
    pub fn with_day_picker(search: S, days: D) -> Self {
        Self { search, days }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// Verifies `property_id` starting from next month relative to today.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::InvalidInput`] for a non-positive id, a malformed
    ///   currency, or zero adults.
    /// - [`VerifyError::Search`] if the client rejects a probe as invalid.
    ///
    /// Transport, server, and API failures are recorded on the attempt and
    /// never returned.
    pub async fn verify(
        &mut self,
        property_id: i64,
        currency: &str,
        adults: u32,
    ) -> Result<VerificationResult, VerifyError> {
        let today = chrono::Local::now().date_naive();
        self.verify_from(today, property_id, currency, adults).await
    }

    /// Same as [`verify`](Self::verify) with an explicit current date.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub async fn verify_from(
        &mut self,
        today: NaiveDate,
        property_id: i64,
        currency: &str,
        adults: u32,
    ) -> Result<VerificationResult, VerifyError> {
        validate_inputs(property_id, currency, adults)?;

        let anchor = anchor_month(today);
        let total = max_attempts();
        tracing::info!(property_id, start = %anchor, "verifying property");

        let mut result = VerificationResult {
            property_id: Some(property_id),
            status: AvailabilityStatus::Unavailable,
            hotel_name: None,
            daily_rate: None,
            currency: currency.to_owned(),
            successful_dates: None,
            attempts: Vec::new(),
            error_message: None,
        };
        let mut last_error: Option<String> = None;

        for slot in probe_schedule(anchor) {
            if slot.attempt == MONTHS_PER_PHASE + 1 {
                tracing::info!(
                    property_id,
                    "all 2-night attempts failed, retrying with 1-night stays"
                );
            }
            tracing::info!(
                property_id,
                attempt = slot.attempt,
                total,
                month = %slot.month,
                stay = slot.stay.label(),
                "probing"
            );

            let window = pick_window(slot.month, slot.stay, &mut self.days)
                .ok_or_else(|| VerifyError::DateOutOfRange(slot.month.to_string()))?;
            let criteria = HotelSearchCriteria::new(
                vec![property_id],
                StayRequest::new(
                    window.check_in,
                    window.check_out,
                    Occupancy::adults(adults),
                    currency,
                ),
            );

            let outcome = match self.search.search_hotels(&criteria).await {
                Ok(found) => {
                    if let Some(hotel) = found.first() {
                        result.status = AvailabilityStatus::Available;
                        result.hotel_name.clone_from(&hotel.hotel_name);
                        result.daily_rate = hotel.daily_rate;
                        result.successful_dates = Some(window);
                        AttemptOutcome::Hit
                    } else {
                        tracing::debug!(property_id, %window, "no results");
                        AttemptOutcome::Empty
                    }
                }
                Err(e) if e.is_precondition() => return Err(VerifyError::Search(e)),
                Err(e) => {
                    tracing::warn!(property_id, attempt = slot.attempt, error = %e, "probe failed");
                    let message = e.to_string();
                    last_error = Some(message.clone());
                    AttemptOutcome::Error(message)
                }
            };

            let hit = outcome == AttemptOutcome::Hit;
            result.attempts.push(VerificationAttempt {
                attempt: slot.attempt,
                month: slot.month,
                window,
                outcome,
            });

            if hit {
                tracing::info!(
                    property_id,
                    hotel = result.hotel_name.as_deref().unwrap_or("N/A"),
                    dates = %window,
                    "property is AVAILABLE"
                );
                return Ok(result);
            }
        }

        result.error_message = last_error;
        tracing::info!(
            property_id,
            attempts = result.attempts.len(),
            last_error = result.error_message.as_deref().unwrap_or(""),
            "property is UNAVAILABLE"
        );
        Ok(result)
    }

    /// Verifies each candidate in order.
    ///
    /// Candidates without a resolved id get an `Error` row and no probing.
    ///
    /// # Errors
    ///
    /// Propagates the first [`VerifyError`] from [`verify`](Self::verify).
    pub async fn verify_links(
        &mut self,
        candidates: &[LinkCandidate],
        currency: &str,
        adults: u32,
    ) -> Result<Vec<LinkVerification>, VerifyError> {
        let mut rows = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            tracing::info!(
                index = i + 1,
                total = candidates.len(),
                text = %candidate.display_text,
                url = %candidate.raw_url,
                "processing link"
            );
            let result = match candidate.property_id {
                Some(id) => self.verify(id, currency, adults).await?,
                None => {
                    tracing::warn!(url = %candidate.raw_url, "skipping link without property id");
                    VerificationResult::unresolved(currency)
                }
            };
            rows.push(LinkVerification {
                display_text: candidate.display_text.clone(),
                raw_url: candidate.raw_url.clone(),
                result,
            });
        }
        Ok(rows)
    }
}

fn validate_inputs(property_id: i64, currency: &str, adults: u32) -> Result<(), VerifyError> {
    if property_id <= 0 {
        return Err(VerifyError::InvalidInput(format!(
            "property id must be positive, got {property_id}"
        )));
    }
    validate_currency(currency).map_err(|e| VerifyError::InvalidInput(e.to_string()))?;
    if adults == 0 {
        return Err(VerifyError::InvalidInput(
            "at least one adult is required".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
