use crate::models::Condition;
use serde::{Deserialize, Serialize};

pub const CATEGORIES: [&str; 10] = [
    "Möbel",
    "Kleidung",
    "Elektronik",
    "Haushalt",
    "Sport & Freizeit",
    "Kinder & Baby",
    "Bücher",
    "Spiele & Konsolen",
    "Autos & Fahrräder",
    "Sonstiges",
];

pub const DELIVERY_OPTIONS: [&str; 3] = ["Abholung", "Versand", "Treffen"];

pub const CURRENCIES: [&str; 3] = ["EUR", "CHF", "USD"];

/// Option sets offered to clients when building search and listing forms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataResponse {
    pub categories: Vec<String>,
    pub conditions: Vec<String>,
    pub delivery: Vec<String>,
    pub currencies: Vec<String>,
}

impl MetadataResponse {
    pub fn fixed() -> Self {
        Self {
            categories: to_owned(&CATEGORIES),
            conditions: Condition::ALL
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
            delivery: to_owned(&DELIVERY_OPTIONS),
            currencies: to_owned(&CURRENCIES),
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
