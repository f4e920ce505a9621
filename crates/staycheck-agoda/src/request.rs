//! Typed search criteria and the JSON payloads built from them.
//!
//! Validation happens here, before any network activity. A criteria value
//! that fails validation produces [`AgodaError::Precondition`] and is never
//! sent.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AgodaError;

/// Lower bound emitted for a price band when only the maximum was given.
pub const DEFAULT_MIN_DAILY_RATE: u32 = 1;
/// Upper bound emitted for a price band when only the minimum was given.
pub const DEFAULT_MAX_DAILY_RATE: u32 = 100_000;
/// Largest result cap the city search accepts.
pub const MAX_RESULTS_LIMIT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    pub adults: u32,
    pub children: u32,
    /// When present, must hold exactly `children` entries.
    pub children_ages: Option<Vec<u32>>,
}

impl Occupancy {
    #[must_use]
    pub fn adults(adults: u32) -> Self {
        Self {
            adults,
            children: 0,
            children_ages: None,
        }
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::adults(2)
    }
}

/// Fields shared by both search modes.
#[derive(Debug, Clone, PartialEq)]
pub struct StayRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub occupancy: Occupancy,
    pub currency: String,
    pub language: String,
    pub discount_only: bool,
}

impl StayRequest {
    /// A stay with the default language (`en-us`) and no discount filter.
    #[must_use]
    pub fn new(
        check_in: NaiveDate,
        check_out: NaiveDate,
        occupancy: Occupancy,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            check_in,
            check_out,
            occupancy,
            currency: currency.into(),
            language: "en-us".to_owned(),
            discount_only: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    StarRatingAsc,
    StarRatingDesc,
    AllGuestsReviewScore,
    BusinessTravellerReviewScore,
    CouplesReviewScore,
    SoloTravellersReviewScore,
    FamiliesWithYoungReviewScore,
    FamiliesWithTeenReviewScore,
    GroupsReviewScore,
}

impl SortOrder {
    pub const ALL: [SortOrder; 12] = [
        Self::Recommended,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::StarRatingAsc,
        Self::StarRatingDesc,
        Self::AllGuestsReviewScore,
        Self::BusinessTravellerReviewScore,
        Self::CouplesReviewScore,
        Self::SoloTravellersReviewScore,
        Self::FamiliesWithYoungReviewScore,
        Self::FamiliesWithTeenReviewScore,
        Self::GroupsReviewScore,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::PriceAsc => "PriceAsc",
            Self::PriceDesc => "PriceDesc",
            Self::StarRatingAsc => "StarRatingAsc",
            Self::StarRatingDesc => "StarRatingDesc",
            Self::AllGuestsReviewScore => "AllGuestsReviewScore",
            Self::BusinessTravellerReviewScore => "BusinessTravellerReviewScore",
            Self::CouplesReviewScore => "CouplesReviewScore",
            Self::SoloTravellersReviewScore => "SoloTravellersReviewScore",
            Self::FamiliesWithYoungReviewScore => "FamiliesWithYoungReviewScore",
            Self::FamiliesWithTeenReviewScore => "FamiliesWithTeenReviewScore",
            Self::GroupsReviewScore => "GroupsReviewScore",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = AgodaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AgodaError::Precondition(format!("unknown sort order '{s}'")))
    }
}

/// Criteria for a city-wide search.
#[derive(Debug, Clone, PartialEq)]
pub struct CitySearchCriteria {
    pub city_id: i64,
    pub stay: StayRequest,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    /// 0–5.
    pub min_star_rating: Option<f64>,
    /// 0–10.
    pub min_review_score: Option<f64>,
    pub sort_by: SortOrder,
    /// 1–30.
    pub max_results: u32,
}

impl CitySearchCriteria {
    /// City search with no filters, recommended ordering and a cap of 10.
    #[must_use]
    pub fn new(city_id: i64, stay: StayRequest) -> Self {
        Self {
            city_id,
            stay,
            min_price: None,
            max_price: None,
            min_star_rating: None,
            min_review_score: None,
            sort_by: SortOrder::Recommended,
            max_results: 10,
        }
    }
}

/// Criteria for a search restricted to specific properties.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearchCriteria {
    pub hotel_ids: Vec<i64>,
    pub stay: StayRequest,
}

impl HotelSearchCriteria {
    #[must_use]
    pub fn new(hotel_ids: Vec<i64>, stay: StayRequest) -> Self {
        Self { hotel_ids, stay }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Payload<C> {
    criteria: C,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CityCriteria<'a> {
    city_id: i64,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    additional: CityAdditional<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CityAdditional<'a> {
    currency: &'a str,
    language: &'a str,
    occupancy: WireOccupancy<'a>,
    discount_only: bool,
    sort_by: SortOrder,
    max_result: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_star_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_review_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily_rate: Option<DailyRate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HotelCriteria<'a> {
    hotel_id: &'a [i64],
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    additional: HotelAdditional<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HotelAdditional<'a> {
    currency: &'a str,
    language: &'a str,
    occupancy: WireOccupancy<'a>,
    discount_only: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOccupancy<'a> {
    number_of_adult: u32,
    number_of_children: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    children_ages: Option<&'a [u32]>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct DailyRate {
    minimum: u32,
    maximum: u32,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Validates `criteria` and builds the city search request body.
///
/// # Errors
///
/// Returns [`AgodaError::Precondition`] for invalid dates, occupancy,
/// currency, rating/score ranges, price band, or result cap.
pub fn build_city_payload(criteria: &CitySearchCriteria) -> Result<serde_json::Value, AgodaError> {
    validate_stay(&criteria.stay)?;

    if !(1..=MAX_RESULTS_LIMIT).contains(&criteria.max_results) {
        return Err(AgodaError::Precondition(format!(
            "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
            criteria.max_results
        )));
    }
    if let Some(stars) = criteria.min_star_rating {
        check_range("min_star_rating", stars, 0.0, 5.0)?;
    }
    if let Some(score) = criteria.min_review_score {
        check_range("min_review_score", score, 0.0, 10.0)?;
    }
    let daily_rate = price_band(criteria.min_price, criteria.max_price)?;

    let stay = &criteria.stay;
    to_json(&Payload {
        criteria: CityCriteria {
            city_id: criteria.city_id,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            additional: CityAdditional {
                currency: &stay.currency,
                language: &stay.language,
                occupancy: wire_occupancy(&stay.occupancy),
                discount_only: stay.discount_only,
                sort_by: criteria.sort_by,
                max_result: criteria.max_results,
                minimum_star_rating: criteria.min_star_rating,
                minimum_review_score: criteria.min_review_score,
                daily_rate,
            },
        },
    })
}

/// Validates `criteria` and builds the hotel-id search request body.
///
/// # Errors
///
/// Returns [`AgodaError::Precondition`] when `hotel_ids` is empty or the
/// shared stay fields are invalid.
pub fn build_hotel_payload(
    criteria: &HotelSearchCriteria,
) -> Result<serde_json::Value, AgodaError> {
    if criteria.hotel_ids.is_empty() {
        return Err(AgodaError::Precondition(
            "at least one hotel ID is required".to_owned(),
        ));
    }
    validate_stay(&criteria.stay)?;

    let stay = &criteria.stay;
    to_json(&Payload {
        criteria: HotelCriteria {
            hotel_id: &criteria.hotel_ids,
            check_in_date: stay.check_in,
            check_out_date: stay.check_out,
            additional: HotelAdditional {
                currency: &stay.currency,
                language: &stay.language,
                occupancy: wire_occupancy(&stay.occupancy),
                discount_only: stay.discount_only,
            },
        },
    })
}

fn validate_stay(stay: &StayRequest) -> Result<(), AgodaError> {
    if stay.check_out <= stay.check_in {
        return Err(AgodaError::Precondition(format!(
            "check-out date {} must be after check-in date {}",
            stay.check_out, stay.check_in
        )));
    }
    if stay.check_in < chrono::Local::now().date_naive() {
        tracing::warn!(check_in = %stay.check_in, "check-in date is in the past");
    }

    validate_currency(&stay.currency)?;

    let occupancy = &stay.occupancy;
    if occupancy.adults == 0 {
        return Err(AgodaError::Precondition(
            "at least one adult is required".to_owned(),
        ));
    }
    if let Some(ages) = &occupancy.children_ages {
        if u32::try_from(ages.len()).map_or(true, |n| n != occupancy.children) {
            return Err(AgodaError::Precondition(format!(
                "number of children ages ({}) must match number of children ({})",
                ages.len(),
                occupancy.children
            )));
        }
    }
    Ok(())
}

/// Checks that `currency` is a three-letter ASCII code.
///
/// # Errors
///
/// Returns [`AgodaError::Precondition`] otherwise.
pub fn validate_currency(currency: &str) -> Result<(), AgodaError> {
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(AgodaError::Precondition(format!(
            "currency must be a three-letter code, got '{currency}'"
        )))
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), AgodaError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AgodaError::Precondition(format!(
            "{field} must be between {min} and {max}, got {value}"
        )))
    }
}

/// Both bounds are emitted as soon as either is supplied.
fn price_band(min: Option<u32>, max: Option<u32>) -> Result<Option<DailyRate>, AgodaError> {
    if min.is_none() && max.is_none() {
        return Ok(None);
    }
    let band = DailyRate {
        minimum: min.unwrap_or(DEFAULT_MIN_DAILY_RATE),
        maximum: max.unwrap_or(DEFAULT_MAX_DAILY_RATE),
    };
    if band.minimum > band.maximum {
        return Err(AgodaError::Precondition(format!(
            "minimum price {} exceeds maximum price {}",
            band.minimum, band.maximum
        )));
    }
    Ok(Some(band))
}

fn wire_occupancy(occupancy: &Occupancy) -> WireOccupancy<'_> {
    WireOccupancy {
        number_of_adult: occupancy.adults,
        number_of_children: occupancy.children,
        children_ages: occupancy
            .children_ages
            .as_deref()
            .filter(|ages| !ages.is_empty()),
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<serde_json::Value, AgodaError> {
    serde_json::to_value(payload)
        .map_err(|e| AgodaError::Precondition(format!("unserializable criteria: {e}")))
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
