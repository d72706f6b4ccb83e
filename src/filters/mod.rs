//! Browse filters: the canonical query-string state, the debounced price
//! slider, the URL-backed store and the listing projector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod codec;
pub mod debounce;
pub mod navigator;
pub mod projector;
pub mod store;

pub use codec::{decode, encode, href};
pub use debounce::{schedule_commit, Debounced, PendingCommit};
pub use navigator::{MemoryHistory, Navigator};
pub use projector::{project, summary, Projection};
pub use store::FilterStore;

/// Lowest selectable price
pub const PRICE_FLOOR: u32 = 0;
/// Highest selectable price; the slider's right end
pub const PRICE_CEILING: u32 = 2000;

/// Inclusive price bounds with `min <= max` always holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    min: u32,
    max: u32,
}

impl PriceRange {
    /// Build a range from raw handle positions.
    ///
    /// Both handles are clamped into `[PRICE_FLOOR, PRICE_CEILING]`. When the
    /// min handle ends up above the max handle it is pulled down to it.
    pub fn new(min: i64, max: i64) -> Self {
        let clamp = |v: i64| v.clamp(PRICE_FLOOR as i64, PRICE_CEILING as i64) as u32;
        let max = clamp(max);
        let min = clamp(min).min(max);
        Self { min, max }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min as f64 && price <= self.max as f64
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: PRICE_FLOOR,
            max: PRICE_CEILING,
        }
    }
}

/// Selected category slugs.
///
/// Members are unique. Equality ignores order, but iteration keeps the
/// order in which members were added so the URL reflects the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member; returns false if it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    /// Remove a member; returns false if it was absent
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != name);
        self.0.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl PartialEq for CategorySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|c| other.contains(c))
    }
}

impl Eq for CategorySet {}

impl<S: Into<String>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Ordering of the projected listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Recent,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Recent => "Most Recent",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(SortKey::Recent),
            "price-low" => Ok(SortKey::PriceLow),
            "price-high" => Ok(SortKey::PriceHigh),
            other => Err(format!(
                "unknown sort key '{}' (expected recent, price-low or price-high)",
                other
            )),
        }
    }
}

/// Every active search, filter and sort criterion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub price_range: PriceRange,
    pub categories: CategorySet,
    pub sort_by: SortKey,
}
