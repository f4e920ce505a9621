//! Response types for the affiliate long-tail search endpoint.
//!
//! The endpoint answers with either `{"results": [...]}` or
//! `{"error": {"id": ..., "message": ...}}`. A missing `results` key means an
//! empty result set.

use serde::{Deserialize, Serialize};

/// One property returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRecord {
    pub hotel_id: i64,
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default, rename = "roomtypeName")]
    pub room_type_name: Option<String>,
    #[serde(default)]
    pub star_rating: Option<f64>,
    #[serde(default)]
    pub review_score: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
    /// Nightly rate in `currency`, as reported.
    #[serde(default)]
    pub daily_rate: Option<f64>,
    /// Pre-discount nightly rate.
    #[serde(default)]
    pub crossed_out_rate: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub free_wifi: Option<bool>,
    #[serde(default)]
    pub include_breakfast: Option<bool>,
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(default, rename = "landingURL")]
    pub landing_url: Option<String>,
}

/// Ordered hotel records from one API call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub hotels: Vec<HotelRecord>,
}

impl SearchResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&HotelRecord> {
        self.hotels.first()
    }
}

/// The `error` object of a failed response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub message: Option<String>,
}
