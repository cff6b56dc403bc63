pub mod config;
pub mod errors;
pub mod requests;
pub mod world_cup;

mod country_scraper;
mod harvester;
mod holiday_writer;
mod scraping_context;
mod text_manipulators;
mod type_classifier;
mod year_table_scraper;

pub type Year = i32;

pub use config::{HarvestConfig, HarvestEnv, Job, LoadFromEnv, WorldCupConfig};
pub use country_scraper::{CountryLinkMatcher, discover_countries, parse_country_slugs};
pub use errors::{AttemptFailure, ClientError, ConfigError, FetchError, HarvestError, WorldCupError};
pub use harvester::{HarvestSummary, HolidayHarvester};
pub use holiday_writer::{HOLIDAY_HEADERS, HolidayCsvWriter};
pub use requests::RequestClient;
pub use scraping_context::ScrapingContext;
pub use type_classifier::TypeClassifier;
pub use year_table_scraper::{
    HolidayRecord, RowOutcome, SkipReason, parse_year_page, resolve_type_column,
    scrape_country_year,
};
