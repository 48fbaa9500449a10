//! Translation of search parameters into a MongoDB filter.
//!
//! Parameters are first turned into a small predicate tree ([`ListingFilter`])
//! and then compiled to a BSON document, so the shape of the query can be
//! inspected and tested without a database.

use crate::dtos::ListingQuery;
use mongodb::bson::{doc, Bson, Document};

/// Fields searched by the free-text term.
pub const TEXT_SEARCH_FIELDS: [&str; 3] = ["title", "description", "tags"];

#[derive(Debug, Clone, PartialEq)]
pub enum ListingFilter {
    /// All children must match. An empty conjunction matches everything.
    And(Vec<ListingFilter>),
    /// At least one field contains `term`, ignoring case.
    AnyContains {
        fields: Vec<&'static str>,
        term: String,
    },
    /// Field equals `value` exactly.
    Equals { field: &'static str, value: String },
    /// Inclusive numeric range; a missing bound is open.
    Range {
        field: &'static str,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl ListingFilter {
    pub fn match_all() -> Self {
        ListingFilter::And(Vec::new())
    }

    /// Build the predicate tree for a listing search.
    ///
    /// Empty strings are treated like absent parameters.
    pub fn from_query(query: &ListingQuery) -> Self {
        let mut predicates = Vec::new();

        if let Some(term) = non_empty(&query.q) {
            predicates.push(ListingFilter::AnyContains {
                fields: TEXT_SEARCH_FIELDS.to_vec(),
                term: term.to_string(),
            });
        }
        if let Some(category) = non_empty(&query.category) {
            predicates.push(ListingFilter::Equals {
                field: "category",
                value: category.to_string(),
            });
        }
        if let Some(condition) = non_empty(&query.condition) {
            predicates.push(ListingFilter::Equals {
                field: "condition",
                value: condition.to_string(),
            });
        }
        if query.min_price.is_some() || query.max_price.is_some() {
            predicates.push(ListingFilter::Range {
                field: "price",
                min: query.min_price,
                max: query.max_price,
            });
        }

        ListingFilter::And(predicates)
    }

    /// Compile to the document passed to `find`.
    pub fn to_document(&self) -> Document {
        match self {
            ListingFilter::And(children) => {
                let compiled: Vec<Document> = children.iter().map(Self::to_document).collect();
                merge_conjunction(compiled)
            }
            ListingFilter::AnyContains { fields, term } => {
                let pattern = regex::escape(term);
                let alternatives: Vec<Document> = fields
                    .iter()
                    .map(|field| {
                        doc! { *field: { "$regex": pattern.as_str(), "$options": "i" } }
                    })
                    .collect();
                doc! { "$or": alternatives }
            }
            ListingFilter::Equals { field, value } => doc! { *field: value.as_str() },
            ListingFilter::Range { field, min, max } => {
                let mut bounds = Document::new();
                if let Some(min) = min {
                    bounds.insert("$gte", *min);
                }
                if let Some(max) = max {
                    bounds.insert("$lte", *max);
                }
                if bounds.is_empty() {
                    Document::new()
                } else {
                    doc! { *field: bounds }
                }
            }
        }
    }
}

/// Merge conjunct documents into one flat document when their keys are
/// disjoint, which is the common case; otherwise fall back to `$and`.
fn merge_conjunction(parts: Vec<Document>) -> Document {
    let parts: Vec<Document> = parts.into_iter().filter(|d| !d.is_empty()).collect();

    let total_keys: usize = parts.iter().map(Document::len).sum();
    let mut merged = Document::new();
    for part in &parts {
        for (key, value) in part {
            merged.insert(key.clone(), value.clone());
        }
    }

    if merged.len() == total_keys {
        merged
    } else {
        let all: Vec<Bson> = parts.into_iter().map(Bson::Document).collect();
        doc! { "$and": all }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ListingQuery {
        ListingQuery::default()
    }

    #[test]
    fn no_parameters_produce_an_empty_filter() {
        let filter = ListingFilter::from_query(&query());
        assert_eq!(filter, ListingFilter::match_all());
        assert_eq!(filter.to_document(), Document::new());
    }

    #[test]
    fn empty_strings_are_ignored() {
        let filter = ListingFilter::from_query(&ListingQuery {
            q: Some(String::new()),
            category: Some(String::new()),
            condition: Some(String::new()),
            ..query()
        });
        assert_eq!(filter.to_document(), Document::new());
    }

    #[test]
    fn text_term_searches_title_description_and_tags() {
        let filter = ListingFilter::from_query(&ListingQuery {
            q: Some("Sofa".to_string()),
            ..query()
        });
        assert_eq!(
            filter.to_document(),
            doc! {
                "$or": [
                    { "title": { "$regex": "Sofa", "$options": "i" } },
                    { "description": { "$regex": "Sofa", "$options": "i" } },
                    { "tags": { "$regex": "Sofa", "$options": "i" } },
                ]
            }
        );
    }

    #[test]
    fn text_term_is_matched_literally() {
        let filter = ListingFilter::from_query(&ListingQuery {
            q: Some("C++ (neu)".to_string()),
            ..query()
        });
        let document = filter.to_document();
        let alternatives = document.get_array("$or").unwrap();
        let first = alternatives[0].as_document().unwrap();
        let pattern = first.get_document("title").unwrap().get_str("$regex").unwrap();
        assert_eq!(pattern, r"C\+\+ \(neu\)");
    }

    #[test]
    fn category_and_condition_are_exact_matches() {
        let filter = ListingFilter::from_query(&ListingQuery {
            category: Some("Elektronik".to_string()),
            condition: Some("Wie neu".to_string()),
            ..query()
        });
        assert_eq!(
            filter.to_document(),
            doc! { "category": "Elektronik", "condition": "Wie neu" }
        );
    }

    #[test]
    fn price_bounds_combine_into_one_inclusive_range() {
        let both = ListingFilter::from_query(&ListingQuery {
            min_price: Some(10.0),
            max_price: Some(50.0),
            ..query()
        });
        assert_eq!(
            both.to_document(),
            doc! { "price": { "$gte": 10.0, "$lte": 50.0 } }
        );

        let min_only = ListingFilter::from_query(&ListingQuery {
            min_price: Some(0.0),
            ..query()
        });
        assert_eq!(min_only.to_document(), doc! { "price": { "$gte": 0.0 } });

        let max_only = ListingFilter::from_query(&ListingQuery {
            max_price: Some(5.0),
            ..query()
        });
        assert_eq!(max_only.to_document(), doc! { "price": { "$lte": 5.0 } });
    }

    #[test]
    fn all_parameters_are_anded() {
        let filter = ListingFilter::from_query(&ListingQuery {
            q: Some("tisch".to_string()),
            category: Some("Möbel".to_string()),
            condition: Some("Gut".to_string()),
            min_price: Some(20.0),
            max_price: Some(200.0),
            limit: 5,
        });

        let document = filter.to_document();
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();
        assert_eq!(keys, ["$or", "category", "condition", "price"]);
    }

    #[test]
    fn colliding_keys_fall_back_to_and() {
        let filter = ListingFilter::And(vec![
            ListingFilter::Equals {
                field: "category",
                value: "Möbel".to_string(),
            },
            ListingFilter::Equals {
                field: "category",
                value: "Haushalt".to_string(),
            },
        ]);
        assert_eq!(
            filter.to_document(),
            doc! { "$and": [ { "category": "Möbel" }, { "category": "Haushalt" } ] }
        );
    }
}
