pub mod listing;

pub use listing::{Condition, ContactInfo, Listing, DEFAULT_CURRENCY, LISTING_COLLECTION};
