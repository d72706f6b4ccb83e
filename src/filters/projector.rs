use super::{FilterState, SortKey};
use crate::models::Listing;
use std::sync::Arc;

/// Filter and order `listings` for display. Pure; ties keep input order.
pub fn project<'a>(listings: &'a [Listing], filters: &FilterState) -> Vec<&'a Listing> {
    project_indices(listings, filters)
        .into_iter()
        .map(move |i| &listings[i])
        .collect()
}

/// "N items found" line shown above the grid
pub fn summary(count: usize) -> String {
    if count == 1 {
        "1 item found".to_string()
    } else {
        format!("{} items found", count)
    }
}

fn project_indices(listings: &[Listing], filters: &FilterState) -> Vec<usize> {
    let needle = filters.search.to_lowercase();
    let mut visible: Vec<usize> = listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| matches(listing, filters, &needle))
        .map(|(i, _)| i)
        .collect();

    // sort_by is stable
    match filters.sort_by {
        SortKey::Recent => {
            visible.sort_by(|&a, &b| listings[b].created_at.cmp(&listings[a].created_at))
        }
        SortKey::PriceLow => {
            visible.sort_by(|&a, &b| listings[a].price.total_cmp(&listings[b].price))
        }
        SortKey::PriceHigh => {
            visible.sort_by(|&a, &b| listings[b].price.total_cmp(&listings[a].price))
        }
    }
    visible
}

fn matches(listing: &Listing, filters: &FilterState, needle: &str) -> bool {
    if !needle.is_empty() && !listing.title.to_lowercase().contains(needle) {
        return false;
    }
    if !filters.price_range.contains(listing.price) {
        return false;
    }
    filters.categories.is_empty() || filters.categories.contains(&listing.category)
}

/// Memoized projection over a shared listings snapshot.
///
/// Recomputes only when the snapshot (by pointer) or the filters change.
#[derive(Debug, Default)]
pub struct Projection {
    source: Option<Arc<Vec<Listing>>>,
    filters: Option<FilterState>,
    indices: Vec<usize>,
    recomputed: usize,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<'a>(
        &mut self,
        listings: &'a Arc<Vec<Listing>>,
        filters: &FilterState,
    ) -> Vec<&'a Listing> {
        let fresh = self
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, listings))
            && self.filters.as_ref() == Some(filters);

        if !fresh {
            self.indices = project_indices(listings, filters);
            self.source = Some(Arc::clone(listings));
            self.filters = Some(filters.clone());
            self.recomputed += 1;
        }

        self.indices.iter().map(move |&i| &listings[i]).collect()
    }

    /// How many times the projection was actually computed
    pub fn recomputations(&self) -> usize {
        self.recomputed
    }
}
