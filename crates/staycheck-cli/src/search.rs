//! `search-city` and `search-hotels` command handlers.

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Args;
use staycheck_agoda::{
    AgodaClient, CitySearchCriteria, HotelSearchCriteria, Occupancy, SearchResult, SortOrder,
    StayRequest,
};
use staycheck_core::AppConfig;

/// Dates, occupancy and locale shared by both search commands.
#[derive(Debug, Args)]
pub(crate) struct StayArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: NaiveDate,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub adults: Option<u32>,
    #[arg(long)]
    pub children: Option<u32>,
    /// Comma-separated children ages (e.g. 10,12)
    #[arg(long, value_delimiter = ',')]
    pub children_ages: Option<Vec<u32>>,
    /// Only hotels with a discount
    #[arg(long)]
    pub discount_only: bool,
}

impl StayArgs {
    pub(crate) fn to_stay(&self, config: &AppConfig) -> StayRequest {
        let occupancy = Occupancy {
            adults: self.adults.unwrap_or(config.default_adults),
            children: self.children.unwrap_or(config.default_children),
            children_ages: self.children_ages.clone(),
        };
        let currency = self
            .currency
            .as_deref()
            .map_or_else(|| config.default_currency.clone(), str::to_ascii_uppercase);
        let mut stay = StayRequest::new(self.check_in, self.check_out, occupancy, currency);
        stay.language = self
            .language
            .clone()
            .unwrap_or_else(|| config.default_language.clone());
        stay.discount_only = self.discount_only;
        stay
    }
}

#[derive(Debug, Args)]
pub(crate) struct CitySearchArgs {
    #[arg(long)]
    pub city_id: i64,
    #[command(flatten)]
    pub stay: StayArgs,
    /// Minimum daily rate
    #[arg(long)]
    pub min_price: Option<u32>,
    /// Maximum daily rate
    #[arg(long)]
    pub max_price: Option<u32>,
    /// Minimum star rating (0-5)
    #[arg(long)]
    pub min_star_rating: Option<f64>,
    /// Minimum review score (0-10)
    #[arg(long)]
    pub min_review_score: Option<f64>,
    #[arg(long, default_value = "Recommended")]
    pub sort_by: SortOrder,
    /// Maximum number of results (1-30)
    #[arg(long, default_value = "10")]
    pub max_results: u32,
}

impl CitySearchArgs {
    pub(crate) fn to_criteria(&self, config: &AppConfig) -> CitySearchCriteria {
        CitySearchCriteria {
            min_price: self.min_price,
            max_price: self.max_price,
            min_star_rating: self.min_star_rating,
            min_review_score: self.min_review_score,
            sort_by: self.sort_by,
            max_results: self.max_results,
            ..CitySearchCriteria::new(self.city_id, self.stay.to_stay(config))
        }
    }
}

pub(crate) async fn run_search_city(
    client: &AgodaClient,
    config: &AppConfig,
    args: &CitySearchArgs,
) -> anyhow::Result<ExitCode> {
    let criteria = args.to_criteria(config);
    tracing::info!(city_id = criteria.city_id, "searching city");
    let result = client.search_by_city(&criteria).await?;
    emit(&result)
}

pub(crate) async fn run_search_hotels(
    client: &AgodaClient,
    config: &AppConfig,
    hotel_ids: Vec<i64>,
    stay: &StayArgs,
) -> anyhow::Result<ExitCode> {
    let criteria = HotelSearchCriteria::new(hotel_ids, stay.to_stay(config));
    tracing::info!(hotels = criteria.hotel_ids.len(), "searching hotels");
    let result = client.search_by_hotel_ids(&criteria).await?;
    emit(&result)
}

fn emit(result: &SearchResult) -> anyhow::Result<ExitCode> {
    if result.is_empty() {
        tracing::warn!("no hotels found");
    } else {
        tracing::info!(count = result.hotels.len(), "hotels found");
    }
    println!("{}", serde_json::to_string_pretty(&result.hotels)?);
    Ok(ExitCode::SUCCESS)
}
