use crate::backend::types::ChangeEvent;
use crate::error::Result;
use crate::models::{Listing, ListingPatch, NewListing};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Relational store holding the `listings` table.
/// Writes are last-write-wins; there is no conflict detection.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a validated listing and return its id
    async fn insert(&self, listing: NewListing) -> Result<i64>;

    /// Apply a partial update to an existing listing
    async fn update(&self, id: i64, patch: ListingPatch) -> Result<()>;

    /// Every stored listing
    async fn select_all(&self) -> Result<Vec<Listing>>;

    /// The listing with `id`, if there is one
    async fn select_one(&self, id: i64) -> Result<Option<Listing>>;

    /// Change notifications for every table this store owns
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Bucket of uploaded listing photos
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`; with `upsert` an existing object is replaced
    async fn upload(&self, key: &str, bytes: Vec<u8>, upsert: bool) -> Result<()>;

    /// Public URL an uploaded object is served from
    fn public_url(&self, key: &str) -> String;
}
