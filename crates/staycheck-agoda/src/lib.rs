//! Client for the Agoda affiliate long-tail search API.

pub mod classify;
pub mod client;
pub mod error;
pub mod request;
pub mod retry;
pub mod search;
pub mod types;

pub use classify::{classify, classify_status, status_message, Verdict};
pub use client::AgodaClient;
pub use error::AgodaError;
pub use request::{
    build_city_payload, build_hotel_payload, validate_currency, CitySearchCriteria,
    HotelSearchCriteria, Occupancy, SortOrder, StayRequest,
};
pub use retry::RetryPolicy;
pub use search::HotelSearch;
pub use types::{HotelRecord, SearchResult};
