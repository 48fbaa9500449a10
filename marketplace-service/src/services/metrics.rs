//! Metrics collection and Prometheus export.

use crate::dtos::metadata::CATEGORIES;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!(
            "failed to install Prometheus recorder: {}",
            e
        ))
    })?;

    // A concurrent caller may have won the race; its handle is equivalent.
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

/// Count a created listing. Categories outside the fixed set are folded into
/// `other` to keep label cardinality bounded.
pub fn record_listing_created(category: Option<&str>) {
    let category = match category {
        Some(c) if CATEGORIES.contains(&c) => c.to_string(),
        Some(_) => "other".to_string(),
        None => "none".to_string(),
    };
    counter!("listings_created_total", "category" => category).increment(1);
}

pub fn record_listing_search(result_count: usize) {
    let outcome = if result_count == 0 { "empty" } else { "hits" };
    counter!("listing_searches_total", "outcome" => outcome).increment(1);
}
