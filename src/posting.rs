use crate::backend::{ListingRepository, ObjectStorage};
use crate::error::{MarketError, Result};
use crate::models::{validate, ListingPatch, NewListing};
use std::path::Path;
use tracing::{debug, info, warn};

/// Photo attached to a new listing
#[derive(Debug, Clone)]
pub struct Photo {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Object key for the photo of listing `id`: `{id}.{ext}`
    pub fn object_key(&self, id: i64) -> String {
        match Path::new(&self.file_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", id, ext.to_lowercase()),
            None => id.to_string(),
        }
    }
}

/// Validate and store a new listing, then upload its photo.
///
/// The photo is uploaded after the insert so it can be keyed by the new
/// id. A failed upload fails the call (the listing row stays). A failed
/// `image_url` backfill is only logged.
pub async fn post_listing(
    repo: &dyn ListingRepository,
    storage: &dyn ObjectStorage,
    listing: NewListing,
    photo: Option<Photo>,
) -> Result<i64> {
    validate(&listing).map_err(MarketError::Validation)?;

    let id = repo.insert(listing).await?;
    info!("Created listing {}", id);

    let Some(photo) = photo.filter(|p| !p.bytes.is_empty()) else {
        return Ok(id);
    };

    let key = photo.object_key(id);
    debug!("Uploading {} ({} bytes)", key, photo.bytes.len());
    storage
        .upload(&key, photo.bytes, true)
        .await
        .map_err(|e| match e {
            e @ MarketError::Upload(_) => e,
            other => MarketError::Upload(other.to_string()),
        })?;

    let patch = ListingPatch {
        image_url: Some(storage.public_url(&key)),
    };
    if let Err(e) = repo.update(id, patch).await {
        warn!("Error updating listing {} with image URL: {}", id, e);
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryRepository, MemoryStorage};
    use async_trait::async_trait;

    fn form() -> NewListing {
        NewListing {
            title: "Film camera".to_string(),
            description: "Works great".to_string(),
            price: 120.0,
            category: "Electronics".to_string(),
            seller_email: "seller@example.com".to_string(),
            location: Some("Portland".to_string()),
        }
    }

    fn photo(name: &str) -> Photo {
        Photo {
            file_name: name.to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    struct BrokenStorage;

    #[async_trait]
    impl ObjectStorage for BrokenStorage {
        async fn upload(&self, _key: &str, _bytes: Vec<u8>, _upsert: bool) -> Result<()> {
            Err(MarketError::Io(std::io::Error::other("bucket offline")))
        }

        fn public_url(&self, key: &str) -> String {
            format!("http://nowhere/{}", key)
        }
    }

    #[test]
    fn object_key_uses_id_and_extension() {
        assert_eq!(photo("IMG_001.JPG").object_key(5), "5.jpg");
        assert_eq!(photo("archive.tar.gz").object_key(5), "5.gz");
        assert_eq!(photo("photo").object_key(5), "5");
    }

    #[tokio::test]
    async fn posts_listing_without_photo() {
        let repo = MemoryRepository::new("Unknown");
        let storage = MemoryStorage::new("wall-photos", "http://localhost");

        let id = post_listing(&repo, &storage, form(), None).await.unwrap();

        let rows = repo.select_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].category, "electronics");
        assert_eq!(rows[0].image_url, None);
    }

    #[tokio::test]
    async fn uploads_photo_and_backfills_url() {
        let repo = MemoryRepository::new("Unknown");
        let storage = MemoryStorage::new("wall-photos", "http://localhost");

        let id = post_listing(&repo, &storage, form(), Some(photo("cam.png")))
            .await
            .unwrap();

        assert_eq!(storage.get(&format!("{}.png", id)).await, Some(vec![0xFF, 0xD8, 0xFF]));
        let rows = repo.select_all().await.unwrap();
        assert_eq!(
            rows[0].image_url.as_deref(),
            Some("http://localhost/wall-photos/1.png")
        );
    }

    #[tokio::test]
    async fn empty_photo_is_ignored() {
        let repo = MemoryRepository::new("Unknown");
        let storage = MemoryStorage::new("wall-photos", "http://localhost");
        let empty = Photo {
            file_name: "blank.png".to_string(),
            bytes: Vec::new(),
        };

        post_listing(&repo, &storage, form(), Some(empty)).await.unwrap();
        assert_eq!(storage.get("1.png").await, None);
    }

    #[tokio::test]
    async fn invalid_listing_is_not_stored() {
        let repo = MemoryRepository::new("Unknown");
        let storage = MemoryStorage::new("wall-photos", "http://localhost");
        let bad = NewListing {
            seller_email: "nope".to_string(),
            ..form()
        };

        let err = post_listing(&repo, &storage, bad, None).await.unwrap_err();
        match err {
            MarketError::Validation(errors) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["seller_email"])
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(repo.select_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_failure_is_reported() {
        let repo = MemoryRepository::new("Unknown");

        let err = post_listing(&repo, &BrokenStorage, form(), Some(photo("a.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::Upload(_)));
        assert!(err.to_string().contains("bucket offline"));

        let rows = repo.select_all().await.unwrap();
        assert_eq!(rows[0].image_url, None);
    }
}
