//! Mapping between [`FilterState`] and the `/` route's query string.
//!
//! The encoding is canonical: a field holding its default value is left
//! out entirely. Decoding never fails; anything missing or malformed falls
//! back to the field's default.

use super::{CategorySet, FilterState, PriceRange, SortKey, PRICE_CEILING, PRICE_FLOOR};
use url::form_urlencoded;

const SEARCH: &str = "search";
const MIN_PRICE: &str = "minPrice";
const MAX_PRICE: &str = "maxPrice";
const CATEGORIES: &str = "categories";
const SORT_BY: &str = "sortBy";

/// Parse a query string (with or without the leading `?`)
pub fn decode(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut search = None;
    let mut min_price = None;
    let mut max_price = None;
    let mut categories = None;
    let mut sort_by = None;

    // First occurrence of a key wins
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match &*key {
            SEARCH => &mut search,
            MIN_PRICE => &mut min_price,
            MAX_PRICE => &mut max_price,
            CATEGORIES => &mut categories,
            SORT_BY => &mut sort_by,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let min = parse_bound(min_price.as_deref(), PRICE_FLOOR);
    let max = parse_bound(max_price.as_deref(), PRICE_CEILING);

    FilterState {
        search: search.unwrap_or_default(),
        price_range: PriceRange::new(min, max),
        categories: categories
            .as_deref()
            .map(parse_categories)
            .unwrap_or_default(),
        sort_by: sort_by
            .as_deref()
            .and_then(|s| s.parse::<SortKey>().ok())
            .unwrap_or_default(),
    }
}

/// Canonical, minimal query string for `filters` (no leading `?`)
pub fn encode(filters: &FilterState) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());

    if !filters.search.is_empty() {
        params.append_pair(SEARCH, &filters.search);
    }
    let range = filters.price_range;
    if range.min() != PRICE_FLOOR {
        params.append_pair(MIN_PRICE, &range.min().to_string());
    }
    if range.max() != PRICE_CEILING {
        params.append_pair(MAX_PRICE, &range.max().to_string());
    }
    if !filters.categories.is_empty() {
        let joined = filters.categories.iter().collect::<Vec<_>>().join(",");
        params.append_pair(CATEGORIES, &joined);
    }
    if filters.sort_by != SortKey::Recent {
        params.append_pair(SORT_BY, filters.sort_by.as_str());
    }

    params.finish()
}

/// Location for `filters`: the bare path when every field is default
pub fn href(filters: &FilterState) -> String {
    let query = encode(filters);
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", query)
    }
}

fn parse_bound(raw: Option<&str>, default: u32) -> i64 {
    let Some(raw) = raw.map(str::trim) else {
        return default as i64;
    };
    if let Ok(value) = raw.parse::<i64>() {
        return value;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => default as i64,
    }
}

fn parse_categories(raw: &str) -> CategorySet {
    if raw.trim().is_empty() {
        return CategorySet::new();
    }
    raw.split(',').filter(|c| !c.trim().is_empty()).collect()
}
