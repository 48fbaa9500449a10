pub mod diagnostics;
pub mod listings;
pub mod metadata;

pub use diagnostics::DiagnosticsResponse;
pub use listings::{
    CreateListingRequest, CreateListingResponse, ListingListResponse, ListingQuery,
    ListingResponse,
};
pub use metadata::MetadataResponse;
