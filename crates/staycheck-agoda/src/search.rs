use std::future::Future;

use crate::client::AgodaClient;
use crate::error::AgodaError;
use crate::request::HotelSearchCriteria;
use crate::types::SearchResult;

/// Hotel-id search, the one capability availability probing needs.
///
/// [`AgodaClient`] is the production implementation; tests substitute
/// scripted fakes.
pub trait HotelSearch {
    fn search_hotels(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> impl Future<Output = Result<SearchResult, AgodaError>> + Send;
}

impl HotelSearch for AgodaClient {
    fn search_hotels(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> impl Future<Output = Result<SearchResult, AgodaError>> + Send {
        self.search_by_hotel_ids(criteria)
    }
}

impl<T: HotelSearch + ?Sized> HotelSearch for &T {
    fn search_hotels(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> impl Future<Output = Result<SearchResult, AgodaError>> + Send {
        (**self).search_hotels(criteria)
    }
}
