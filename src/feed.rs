//! Live listings snapshot: fetched once on start, re-fetched whenever the
//! repository reports a change to the `listings` table.

use crate::backend::{ListingRepository, LISTINGS_TABLE};
use crate::models::Listing;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type Snapshot = Option<Arc<Vec<Listing>>>;

pub struct ListingFeed {
    snapshots: watch::Receiver<Snapshot>,
    task: JoinHandle<()>,
}

impl ListingFeed {
    /// Start fetching. Must be called inside a tokio runtime.
    pub fn start(repo: Arc<dyn ListingRepository>) -> Self {
        let (tx, snapshots) = watch::channel(None);
        // Subscribe before the first fetch so no change slips between them
        let mut changes = repo.subscribe();

        let task = tokio::spawn(async move {
            refresh(repo.as_ref(), &tx).await;
            loop {
                match changes.recv().await {
                    Ok(event) if event.table == LISTINGS_TABLE => {
                        debug!("{:?} on listing {}, refetching", event.kind, event.id);
                        refresh(repo.as_ref(), &tx).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Missed {} change notifications, refetching", missed);
                        refresh(repo.as_ref(), &tx).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Self { snapshots, task }
    }

    /// Latest listings; `None` until the first fetch succeeds
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshots.borrow().is_none()
    }

    /// Wait for a newer snapshot than the last one seen through this feed.
    /// Returns false once the feed has stopped.
    pub async fn changed(&mut self) -> bool {
        self.snapshots.changed().await.is_ok()
    }
}

impl Drop for ListingFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn refresh(repo: &dyn ListingRepository, tx: &watch::Sender<Snapshot>) {
    match repo.select_all().await {
        Ok(listings) => {
            debug!("Fetched {} listings", listings.len());
            let _ = tx.send(Some(Arc::new(listings)));
        }
        Err(e) => warn!("Failed to fetch listings, keeping previous snapshot: {}", e),
    }
}
