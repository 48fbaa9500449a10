use serde::{Deserialize, Serialize};

pub const BACKEND_RUNNING: &str = "✅ Running";
pub const DATABASE_NOT_INITIALIZED: &str = "⚠️  Available but not initialized";
pub const DATABASE_WORKING: &str = "✅ Connected & Working";
pub const CONNECTED: &str = "Connected";
pub const NOT_CONNECTED: &str = "Not Connected";
pub const SETTING_SET: &str = "✅ Set";
pub const SETTING_NOT_SET: &str = "❌ Not Set";

/// Maximum number of collection names reported.
pub const MAX_COLLECTIONS: usize = 10;

/// Error text is cut to this many characters in the status line.
const ERROR_PREVIEW_CHARS: usize = 50;

/// Body of `GET /test`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticsResponse {
    /// Report for a process running without a store handle.
    pub fn without_store(url_set: bool, name_set: bool) -> Self {
        Self {
            backend: BACKEND_RUNNING.to_string(),
            database: DATABASE_NOT_INITIALIZED.to_string(),
            database_url: setting_status(url_set).to_string(),
            database_name: setting_status(name_set).to_string(),
            connection_status: NOT_CONNECTED.to_string(),
            collections: Vec::new(),
        }
    }

    /// Report for a store whose collections could be listed.
    pub fn working(database_name: &str, mut collections: Vec<String>) -> Self {
        collections.truncate(MAX_COLLECTIONS);
        Self {
            backend: BACKEND_RUNNING.to_string(),
            database: DATABASE_WORKING.to_string(),
            database_url: SETTING_SET.to_string(),
            database_name: database_name.to_string(),
            connection_status: CONNECTED.to_string(),
            collections,
        }
    }

    /// Report for a store that is configured but failed to answer.
    pub fn degraded(database_name: &str, error: &str) -> Self {
        let preview: String = error.chars().take(ERROR_PREVIEW_CHARS).collect();
        Self {
            backend: BACKEND_RUNNING.to_string(),
            database: format!("⚠️  Connected but Error: {}", preview),
            database_url: SETTING_SET.to_string(),
            database_name: database_name.to_string(),
            connection_status: CONNECTED.to_string(),
            collections: Vec::new(),
        }
    }
}

fn setting_status(set: bool) -> &'static str {
    if set {
        SETTING_SET
    } else {
        SETTING_NOT_SET
    }
}
