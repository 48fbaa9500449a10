use crate::dtos::DiagnosticsResponse;
use crate::startup::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

/// Connectivity report for operators.
///
/// Store failures are folded into the status text; this handler never errors.
#[tracing::instrument(skip(state))]
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let settings = &state.config.database;

    let report = match state.db.as_ref() {
        None => {
            DiagnosticsResponse::without_store(settings.url.is_some(), settings.name.is_some())
        }
        Some(db) => match db.collection_names().await {
            Ok(collections) => DiagnosticsResponse::working(db.name(), collections),
            Err(e) => {
                tracing::warn!(error = %e, "Listing collections failed during diagnostics");
                let message = match &e {
                    AppError::DatabaseError(inner) => inner.to_string(),
                    other => other.to_string(),
                };
                DiagnosticsResponse::degraded(db.name(), &message)
            }
        },
    };

    Json(report)
}
