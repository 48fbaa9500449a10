pub mod diagnostics;
pub mod health;
pub mod listings;
pub mod metadata;

pub use diagnostics::diagnostics;
pub use health::{health_check, metrics_endpoint, readiness_check, root};
pub use listings::{create_listing, get_listing, list_listings};
pub use metadata::categories;
