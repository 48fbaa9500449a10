use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Collection holding every listing document.
pub const LISTING_COLLECTION: &str = "listing";

pub const DEFAULT_CURRENCY: &str = "EUR";

/// Item condition, serialized with its German label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Condition {
    #[serde(rename = "Neu")]
    New,
    #[serde(rename = "Wie neu")]
    LikeNew,
    #[serde(rename = "Gut")]
    Good,
    #[serde(rename = "Okay")]
    Okay,
    #[serde(rename = "Gebraucht")]
    Used,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Okay,
        Condition::Used,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "Neu",
            Condition::LikeNew => "Wie neu",
            Condition::Good => "Gut",
            Condition::Okay => "Okay",
            Condition::Used => "Gebraucht",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seller contact details attached to a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct ContactInfo {
    pub name: Option<String>,
    #[validate(email(message = "Ungültige E-Mail-Adresse"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A listing as stored in the `listing` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<Condition>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub location: Option<String>,
    #[serde(default)]
    pub delivery_options: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub contact: Option<ContactInfo>,
    // Documents edited outside this service may lack timestamps.
    #[serde(
        default,
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub updated_at: DateTime<Utc>,
}

pub fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
