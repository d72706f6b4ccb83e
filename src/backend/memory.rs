use crate::backend::traits::ListingRepository;
use crate::backend::types::{ChangeEvent, ChangeKind};
use crate::error::{MarketError, Result};
use crate::models::{category_slug, Listing, ListingPatch, NewListing};
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

const CHANGE_BUFFER: usize = 64;

/// Listings table kept in memory, optionally persisted as a JSON snapshot
pub struct MemoryRepository {
    rows: RwLock<Vec<Listing>>,
    changes: broadcast::Sender<ChangeEvent>,
    default_location: String,
}

impl MemoryRepository {
    /// Empty table; inserts without a location get `default_location`
    pub fn new(default_location: impl Into<String>) -> Self {
        Self::with_listings(Vec::new(), default_location)
    }

    pub fn with_listings(listings: Vec<Listing>, default_location: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            rows: RwLock::new(listings),
            changes,
            default_location: default_location.into(),
        }
    }

    /// Read a snapshot written by [`save`](Self::save). A missing file is an
    /// empty table.
    pub async fn load(path: &Path, default_location: impl Into<String>) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            debug!("No snapshot at {}, starting empty", path.display());
            return Ok(Self::new(default_location));
        }
        let json = tokio::fs::read_to_string(path).await?;
        let listings: Vec<Listing> = serde_json::from_str(&json)?;
        info!("Loaded {} listings from {}", listings.len(), path.display());
        Ok(Self::with_listings(listings, default_location))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let rows = self.rows.read().await;
        let json = serde_json::to_string_pretty(&*rows)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;
        info!("💾 Saved {} listings to {}", rows.len(), path.display());
        Ok(())
    }

    fn notify(&self, event: ChangeEvent) {
        // No subscribers is fine
        let _ = self.changes.send(event);
    }
}

#[async_trait]
impl ListingRepository for MemoryRepository {
    async fn insert(&self, listing: NewListing) -> Result<i64> {
        let now = Utc::now();
        let location = listing
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_location.clone());

        let id = {
            let mut rows = self.rows.write().await;
            let id = rows.iter().map(|l| l.id).max().unwrap_or(0) + 1;
            rows.push(Listing {
                id,
                title: listing.title,
                description: listing.description,
                price: listing.price,
                category: category_slug(&listing.category),
                seller_email: listing.seller_email,
                image_url: None,
                location,
                created_at: now,
                updated_at: now,
            });
            id
        };

        debug!("Inserted listing {}", id);
        self.notify(ChangeEvent::listings(ChangeKind::Insert, id));
        Ok(id)
    }

    async fn update(&self, id: i64, patch: ListingPatch) -> Result<()> {
        {
            let mut rows = self.rows.write().await;
            let row = rows
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or(MarketError::NotFound(id))?;
            if let Some(image_url) = patch.image_url {
                row.image_url = Some(image_url);
            }
            row.updated_at = Utc::now();
        }

        debug!("Updated listing {}", id);
        self.notify(ChangeEvent::listings(ChangeKind::Update, id));
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<Listing>> {
        Ok(self.rows.read().await.clone())
    }

    async fn select_one(&self, id: i64) -> Result<Option<Listing>> {
        Ok(self.rows.read().await.iter().find(|l| l.id == id).cloned())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn form(title: &str, category: &str) -> NewListing {
        NewListing {
            title: title.to_string(),
            description: String::new(),
            price: 12.5,
            category: category.to_string(),
            seller_email: "seller@example.com".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_defaults() {
        let repo = MemoryRepository::new("Unknown");
        let first = repo.insert(form("Chair", "Furniture")).await.unwrap();
        let second = repo
            .insert(NewListing {
                location: Some("  Austin ".to_string()),
                ..form("Table", "furniture")
            })
            .await
            .unwrap();
        assert_eq!((first, second), (1, 2));

        let rows = repo.select_all().await.unwrap();
        assert_eq!(rows[0].category, "furniture");
        assert_eq!(rows[0].location, "Unknown");
        assert_eq!(rows[1].location, "Austin");
        assert_eq!(rows[0].image_url, None);
        assert_eq!(rows[0].created_at, rows[0].updated_at);
    }

    #[tokio::test]
    async fn update_backfills_image_url() {
        let repo = MemoryRepository::new("Unknown");
        let id = repo.insert(form("Chair", "furniture")).await.unwrap();
        repo.update(
            id,
            ListingPatch {
                image_url: Some("https://cdn.example.com/1.png".to_string()),
            },
        )
        .await
        .unwrap();

        let rows = repo.select_all().await.unwrap();
        assert_eq!(rows[0].image_url.as_deref(), Some("https://cdn.example.com/1.png"));
        assert!(rows[0].updated_at >= rows[0].created_at);
    }

    #[tokio::test]
    async fn update_of_unknown_id_fails() {
        let repo = MemoryRepository::new("Unknown");
        let err = repo.update(99, ListingPatch::default()).await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound(99)));
    }

    #[tokio::test]
    async fn select_one_finds_by_id() {
        let repo = MemoryRepository::new("Unknown");
        repo.insert(form("Chair", "furniture")).await.unwrap();
        let id = repo.insert(form("Kayak", "sports & recreation")).await.unwrap();

        let found = repo.select_one(id).await.unwrap().unwrap();
        assert_eq!(found.title, "Kayak");
        assert_eq!(found.category, "sports & recreation");
        assert_eq!(repo.select_one(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_are_broadcast() {
        let repo = MemoryRepository::new("Unknown");
        let mut changes = repo.subscribe();
        let id = repo.insert(form("Chair", "furniture")).await.unwrap();
        repo.update(id, ListingPatch::default()).await.unwrap();

        assert_eq!(
            changes.recv().await.unwrap(),
            ChangeEvent::listings(ChangeKind::Insert, id)
        );
        assert_eq!(
            changes.recv().await.unwrap(),
            ChangeEvent::listings(ChangeKind::Update, id)
        );
    }

    #[tokio::test]
    async fn snapshot_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("listings.json");

        let repo = MemoryRepository::new("Unknown");
        repo.insert(form("Chair", "furniture")).await.unwrap();
        repo.insert(form("Kayak", "sports & recreation")).await.unwrap();
        repo.save(&path).await.unwrap();

        let reloaded = MemoryRepository::load(&path, "Unknown").await.unwrap();
        assert_eq!(
            reloaded.select_all().await.unwrap(),
            repo.select_all().await.unwrap()
        );
        assert_eq!(reloaded.insert(form("Tent", "sports & recreation")).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_snapshot_is_empty() {
        let dir = TempDir::new().unwrap();
        let repo = MemoryRepository::load(&dir.path().join("nope.json"), "Unknown")
            .await
            .unwrap();
        assert!(repo.select_all().await.unwrap().is_empty());
    }
}
