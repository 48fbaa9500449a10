use crate::models::listing::default_currency;
use crate::models::{Condition, ContactInfo, Listing};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DEFAULT_LIMIT: i64 = 24;
pub const MAX_LIMIT: i64 = 100;

pub const LISTING_CREATED_MESSAGE: &str = "Angebot erfolgreich erstellt";

/// Body of `POST /api/listings`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<Condition>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    #[validate(range(min = 0.0, message = "Preis darf nicht negativ sein"))]
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
    #[validate(nested)]
    pub contact: Option<ContactInfo>,
}

impl CreateListingRequest {
    /// Turn the request into a storable listing with a fresh id and timestamps.
    pub fn into_listing(self) -> Listing {
        let now = Utc::now();
        Listing {
            id: ObjectId::new(),
            title: self.title,
            description: self.description,
            category: self.category,
            condition: self.condition,
            brand: self.brand,
            size: self.size,
            color: self.color,
            material: self.material,
            price: self.price,
            currency: self.currency,
            location: self.location,
            delivery_options: self.delivery_options,
            image_urls: self.image_urls,
            tags: self.tags,
            contact: self.contact,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateListingResponse {
    pub id: String,
    pub message: String,
}

/// Query string of `GET /api/listings`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_price_bounds"))]
pub struct ListingQuery {
    /// Free-text term matched against title, description and tags.
    pub q: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            q: None,
            category: None,
            condition: None,
            min_price: None,
            max_price: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// `NaN` slips past `range` and `inf` is no usable bound.
fn validate_price_bounds(query: &ListingQuery) -> Result<(), ValidationError> {
    let finite = [query.min_price, query.max_price]
        .into_iter()
        .flatten()
        .all(f64::is_finite);
    if finite {
        Ok(())
    } else {
        let mut error = ValidationError::new("non_finite_price");
        error.message = Some("Preisgrenzen müssen endliche Zahlen sein".into());
        Err(error)
    }
}

/// Public representation of a listing: `_id` becomes a hex `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<Condition>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub price: f64,
    pub currency: String,
    pub location: Option<String>,
    pub delivery_options: Vec<String>,
    pub image_urls: Vec<String>,
    pub tags: Vec<String>,
    pub contact: Option<ContactInfo>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id.to_hex(),
            title: listing.title,
            description: listing.description,
            category: listing.category,
            condition: listing.condition,
            brand: listing.brand,
            size: listing.size,
            color: listing.color,
            material: listing.material,
            price: listing.price,
            currency: listing.currency,
            location: listing.location,
            delivery_options: listing.delivery_options,
            image_urls: listing.image_urls,
            tags: listing.tags,
            contact: listing.contact,
            created_at: listing.created_at.to_rfc3339(),
            updated_at: listing.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingListResponse {
    pub items: Vec<ListingResponse>,
    pub count: usize,
}

impl From<Vec<Listing>> for ListingListResponse {
    fn from(listings: Vec<Listing>) -> Self {
        let items: Vec<ListingResponse> = listings.into_iter().map(ListingResponse::from).collect();
        let count = items.len();
        Self { items, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> CreateListingRequest {
        serde_json::from_value(body).expect("body should deserialize")
    }

    #[test]
    fn minimal_request_gets_defaults() {
        let request = parse(json!({ "title": "Fahrrad", "price": 80 }));
        assert!(request.validate().is_ok());
        assert_eq!(request.currency, "EUR");
        assert!(request.delivery_options.is_empty());
        assert!(request.condition.is_none());
    }

    #[test]
    fn zero_price_is_accepted_negative_is_rejected() {
        assert!(parse(json!({ "title": "Geschenk", "price": 0 }))
            .validate()
            .is_ok());

        let errors = parse(json!({ "title": "Fehler", "price": -1 }))
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn unknown_condition_does_not_deserialize() {
        let result = serde_json::from_value::<CreateListingRequest>(
            json!({ "title": "Lampe", "price": 5, "condition": "Fancy" }),
        );
        assert!(result.is_err());

        let request = parse(json!({ "title": "Lampe", "price": 5, "condition": "Wie neu" }));
        assert_eq!(request.condition, Some(Condition::LikeNew));
    }

    #[test]
    fn missing_title_or_price_does_not_deserialize() {
        assert!(serde_json::from_value::<CreateListingRequest>(json!({ "price": 5 })).is_err());
        assert!(serde_json::from_value::<CreateListingRequest>(json!({ "title": "x" })).is_err());
    }

    #[test]
    fn contact_email_is_validated() {
        let bad = parse(json!({
            "title": "Sofa",
            "price": 50,
            "contact": { "name": "Kim", "email": "not-an-email" }
        }));
        assert!(bad.validate().is_err());

        let good = parse(json!({
            "title": "Sofa",
            "price": 50,
            "contact": { "name": "Kim", "email": "kim@example.org" }
        }));
        assert!(good.validate().is_ok());

        let without_email = parse(json!({
            "title": "Sofa",
            "price": 50,
            "contact": { "phone": "+49 30 1234567" }
        }));
        assert!(without_email.validate().is_ok());
    }

    #[test]
    fn query_limit_bounds() {
        let query = ListingQuery::default();
        assert_eq!(query.limit, 24);
        assert!(query.validate().is_ok());

        for limit in [0, 101, -3] {
            let query = ListingQuery {
                limit,
                ..ListingQuery::default()
            };
            assert!(query.validate().is_err(), "limit {limit} should be rejected");
        }

        for limit in [1, 100] {
            let query = ListingQuery {
                limit,
                ..ListingQuery::default()
            };
            assert!(query.validate().is_ok());
        }
    }

    #[test]
    fn negative_price_bounds_are_rejected() {
        let query = ListingQuery {
            min_price: Some(-1.0),
            ..ListingQuery::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn non_finite_price_bounds_are_rejected() {
        for bound in [f64::NAN, f64::INFINITY] {
            let query = ListingQuery {
                min_price: Some(bound),
                ..ListingQuery::default()
            };
            assert!(query.validate().is_err(), "min_price {bound}");

            let query = ListingQuery {
                max_price: Some(bound),
                ..ListingQuery::default()
            };
            assert!(query.validate().is_err(), "max_price {bound}");
        }

        let query = ListingQuery {
            min_price: Some(0.0),
            max_price: Some(50.0),
            ..ListingQuery::default()
        };
        assert!(query.validate().is_ok());
    }

    #[test]
    fn response_exposes_hex_id_without_internal_key() {
        let listing = parse(json!({ "title": "Buch", "price": 3.5, "tags": ["roman"] }))
            .into_listing();
        let expected_id = listing.id.to_hex();

        let value = serde_json::to_value(ListingResponse::from(listing)).unwrap();
        assert_eq!(value["id"], expected_id);
        assert!(value.get("_id").is_none());
        assert_eq!(value["currency"], "EUR");
        assert_eq!(value["tags"], json!(["roman"]));
    }

    #[test]
    fn list_response_counts_items() {
        let listings = vec![
            parse(json!({ "title": "a", "price": 1 })).into_listing(),
            parse(json!({ "title": "b", "price": 2 })).into_listing(),
        ];
        let response = ListingListResponse::from(listings);
        assert_eq!(response.count, 2);
        assert_eq!(response.items[1].title, "b");
    }
}
