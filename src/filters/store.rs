//! URL-backed filter store.
//!
//! The store keeps no copy of the filters: [`FilterStore::filters`] decodes
//! the navigator's current location on every call, so back/forward
//! navigation is picked up on the next read. The one piece of local state is
//! the price slider, which moves immediately while its URL commit waits for
//! the debounce delay.

use super::codec;
use super::debounce::Debounced;
use super::navigator::Navigator;
use super::{FilterState, PriceRange, SortKey};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct FilterStore<N: Navigator> {
    navigator: N,
    price: Debounced<PriceRange>,
    price_commits: mpsc::UnboundedReceiver<PriceRange>,
    /// Location this store last wrote or adopted
    written: String,
}

impl<N: Navigator> FilterStore<N> {
    pub fn new(navigator: N, debounce: Duration) -> Self {
        let written = navigator.location().to_string();
        let initial = codec::decode(navigator.query()).price_range;
        let (price, price_commits) = Debounced::new(initial, debounce);
        Self {
            navigator,
            price,
            price_commits,
            written,
        }
    }

    /// Filters as encoded in the current location
    pub fn filters(&self) -> FilterState {
        codec::decode(self.navigator.query())
    }

    /// Range the slider should show: the uncommitted drag value if there is
    /// one, otherwise the committed range
    pub fn displayed_price_range(&self) -> PriceRange {
        if self.moved_externally() {
            self.filters().price_range
        } else {
            *self.price.value()
        }
    }

    pub fn has_pending_price(&self) -> bool {
        self.price.is_pending()
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let mut filters = self.current();
        filters.search = text.into();
        self.commit(&filters);
    }

    /// Move the slider; the URL follows once the handles rest
    pub fn set_price_range(&mut self, min: i64, max: i64) {
        if self.moved_externally() {
            self.sync_from_location();
        }
        self.price.set(PriceRange::new(min, max));
    }

    pub fn toggle_category(&mut self, name: &str, included: bool) {
        if name.trim().is_empty() || name.contains(',') {
            warn!("Ignoring category '{}': not a valid slug", name);
            return;
        }
        let mut filters = self.current();
        if included {
            filters.categories.insert(name);
        } else {
            filters.categories.remove(name);
        }
        self.commit(&filters);
    }

    pub fn set_sort_by(&mut self, key: SortKey) {
        let mut filters = self.current();
        filters.sort_by = key;
        self.commit(&filters);
    }

    /// Reset every filter and start a new history entry at `/`
    pub fn clear_all(&mut self) {
        self.discard_pending_price(PriceRange::default());
        self.navigator.push("/");
        self.written = "/".to_string();
        debug!("Cleared all filters");
    }

    /// Adopt the current location after navigation this store did not make.
    ///
    /// Drops any uncommitted slider movement.
    pub fn sync_from_location(&mut self) {
        let range = self.filters().price_range;
        self.discard_pending_price(range);
        self.written = self.navigator.location().to_string();
        debug!("Synced filters from {}", self.written);
    }

    /// Wait for the next debounced slider commit and apply it.
    ///
    /// Returns whether the location changed.
    pub async fn next_price_commit(&mut self) -> bool {
        match self.price_commits.recv().await {
            Some(range) => self.apply_price_commit(range),
            None => false,
        }
    }

    /// Write a debounced range to the location.
    ///
    /// Skipped when the location already holds `range`, or when the location
    /// changed underneath the drag.
    pub fn apply_price_commit(&mut self, range: PriceRange) -> bool {
        if self.moved_externally() {
            debug!("Dropping price commit {:?}: location changed", range);
            self.sync_from_location();
            return false;
        }
        let mut filters = self.filters();
        if filters.price_range == range {
            return false;
        }
        filters.price_range = range;
        self.commit(&filters);
        true
    }

    /// Cancel the pending slider commit without applying it
    pub fn dispose(&mut self) {
        let range = *self.price.value();
        self.discard_pending_price(range);
    }

    fn moved_externally(&self) -> bool {
        self.navigator.location() != self.written
    }

    fn current(&mut self) -> FilterState {
        if self.moved_externally() {
            self.sync_from_location();
        }
        self.filters()
    }

    fn commit(&mut self, filters: &FilterState) {
        let href = codec::href(filters);
        debug!("Committing filters: {}", href);
        self.navigator.replace(&href);
        self.written = href;
    }

    fn discard_pending_price(&mut self, range: PriceRange) {
        self.price.reset(range);
        while self.price_commits.try_recv().is_ok() {}
    }
}
