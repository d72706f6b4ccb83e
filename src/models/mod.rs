use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod validation;

pub use validation::validate;

/// Category slugs offered by the browse filters and the posting form
pub const CATEGORIES: [&str; 8] = [
    "electronics",
    "vehicles",
    "home & garden",
    "clothing & accessories",
    "sports & recreation",
    "books & media",
    "toys & games",
    "furniture",
];

/// Lowercase slug for a category label ("Home & Garden" -> "home & garden")
pub fn category_slug(label: &str) -> String {
    label.trim().to_lowercase()
}

/// A marketplace listing as stored in the `listings` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub seller_email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Relative age of the listing ("3 hours ago")
    pub fn age(&self, now: DateTime<Utc>) -> String {
        let millis = (now - self.created_at).num_milliseconds().unsigned_abs();
        timeago::Formatter::new().convert(Duration::from_millis(millis))
    }
}

/// Listing fields as submitted through the posting form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewListing {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    pub seller_email: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Partial update applied to a stored listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingPatch {
    pub image_url: Option<String>,
}
