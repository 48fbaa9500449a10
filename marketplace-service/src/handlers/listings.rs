use crate::dtos::listings::LISTING_CREATED_MESSAGE;
use crate::dtos::{
    CreateListingRequest, CreateListingResponse, ListingListResponse, ListingQuery,
    ListingResponse,
};
use crate::services::{record_listing_created, record_listing_search, ListingFilter};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use service_core::extract::{ValidatedJson, ValidatedQuery};

#[tracing::instrument(skip_all)]
pub async fn create_listing(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> Result<Json<CreateListingResponse>, AppError> {
    let db = state.store()?;

    let listing = request.into_listing();
    db.insert_listing(&listing).await?;

    record_listing_created(listing.category.as_deref());
    tracing::info!(
        listing_id = %listing.id,
        category = ?listing.category,
        price = listing.price,
        "Listing created"
    );

    Ok(Json(CreateListingResponse {
        id: listing.id.to_hex(),
        message: LISTING_CREATED_MESSAGE.to_string(),
    }))
}

#[tracing::instrument(skip_all)]
pub async fn list_listings(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListingQuery>,
) -> Result<Json<ListingListResponse>, AppError> {
    let db = state.store()?;

    let filter = ListingFilter::from_query(&query);
    tracing::debug!(filter = %filter.to_document(), "Searching listings");

    let listings = db.find_listings(&filter, query.limit).await?;
    record_listing_search(listings.len());

    Ok(Json(ListingListResponse::from(listings)))
}

#[tracing::instrument(skip(state))]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<ListingResponse>, AppError> {
    let id = ObjectId::parse_str(&listing_id)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Ungültige ID")))?;

    let listing = state
        .store()?
        .find_listing(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Angebot nicht gefunden")))?;

    Ok(Json(ListingResponse::from(listing)))
}
