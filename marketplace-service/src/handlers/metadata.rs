use crate::dtos::MetadataResponse;
use axum::Json;

/// Static option sets; independent of the store.
pub async fn categories() -> Json<MetadataResponse> {
    Json(MetadataResponse::fixed())
}
