pub mod database;
pub mod filter;
pub mod metrics;

pub use database::MarketplaceDb;
pub use filter::ListingFilter;
pub use metrics::{get_metrics, init_metrics, record_listing_created, record_listing_search};
