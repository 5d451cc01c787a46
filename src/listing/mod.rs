//! Cached document lists and their reconciliation with the store.
//!
//! Each admin view owns one `DocumentList` per kind. Mutations go
//! through the store first; the cached list is then brought back into
//! agreement either wholesale (after create/update) or optimistically
//! with a delayed authoritative re-fetch (after delete).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::content::{News, Promotion};
use crate::error::{CoopervalError, Result};
use crate::store::ContentStore;

/// Delay before the authoritative re-fetch that follows a delete,
/// covering eventual-consistency lag on the store side.
pub const REFETCH_DELAY: Duration = Duration::from_millis(500);

/// A document kind the admin panel can list.
#[async_trait]
pub trait Listed: Clone + Send + Sync + 'static {
    /// Store-assigned id; always present on fetched documents.
    fn id(&self) -> Option<&str>;

    /// Authoritative full list for this kind, store-ordered.
    async fn fetch_all(store: &dyn ContentStore) -> Result<Vec<Self>>;
}

#[async_trait]
impl Listed for News {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn fetch_all(store: &dyn ContentStore) -> Result<Vec<Self>> {
        store.fetch_news().await
    }
}

#[async_trait]
impl Listed for Promotion {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn fetch_all(store: &dyn ContentStore) -> Result<Vec<Self>> {
        store.fetch_promotions().await
    }
}

/// Cached list of one document kind, kept consistent with the store.
pub struct DocumentList<D: Listed> {
    store: Arc<dyn ContentStore>,
    entries: Arc<Mutex<Vec<D>>>,
    pending_delete: Option<String>,
    refetch_delay: Duration,
    refetch_task: Option<JoinHandle<()>>,
}

impl<D: Listed> DocumentList<D> {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self::with_refetch_delay(store, REFETCH_DELAY)
    }

    pub fn with_refetch_delay(store: Arc<dyn ContentStore>, refetch_delay: Duration) -> Self {
        Self {
            store,
            entries: Arc::new(Mutex::new(Vec::new())),
            pending_delete: None,
            refetch_delay,
            refetch_task: None,
        }
    }

    /// Replace the cached list wholesale from the store. No
    /// incremental merging: the fetched sequence is the new truth.
    pub async fn refresh(&self) -> Result<()> {
        let all = D::fetch_all(self.store.as_ref()).await?;
        *self.entries.lock().await = all;
        Ok(())
    }

    /// Called after a successful create or update. The saved document
    /// is never spliced in locally — server-computed fields make a
    /// full authoritative re-fetch the only drift-free option.
    pub async fn on_saved(&self) -> Result<()> {
        self.refresh().await
    }

    /// Snapshot of the cached entries.
    pub async fn entries(&self) -> Vec<D> {
        self.entries.lock().await.clone()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Stage `id` for deletion. Nothing is sent to the store until the
    /// deletion is explicitly confirmed.
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Execute a previously requested deletion.
    ///
    /// On observed store success the entry is removed from the cached
    /// list immediately, and an authoritative re-fetch is scheduled
    /// after `refetch_delay`. On failure the list and the pending
    /// request are left unchanged so the user can retry.
    pub async fn confirm_delete(&mut self, id: &str) -> Result<()> {
        if self.pending_delete.as_deref() != Some(id) {
            return Err(CoopervalError::DeleteNotConfirmed(id.to_string()));
        }

        self.store.delete(id).await?;
        self.pending_delete = None;

        self.entries.lock().await.retain(|d| d.id() != Some(id));

        let store = Arc::clone(&self.store);
        let entries = Arc::clone(&self.entries);
        let delay = self.refetch_delay;
        self.refetch_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match D::fetch_all(store.as_ref()).await {
                Ok(all) => *entries.lock().await = all,
                Err(e) => tracing::warn!("post-delete re-fetch failed: {e}"),
            }
        }));

        Ok(())
    }

    /// Wait for the scheduled post-delete re-fetch to finish. The
    /// normal flow never awaits it; tests do.
    pub async fn settle(&mut self) {
        if let Some(task) = self.refetch_task.take() {
            let _ = task.await;
        }
    }

    /// Abort the scheduled re-fetch. Called on teardown so a stale
    /// result is never applied to a list nobody is looking at.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.refetch_task.take() {
            task.abort();
        }
    }
}

impl<D: Listed> Drop for DocumentList<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Slug;
    use crate::store::MemoryStore;
    use chrono::{Duration as ChronoDuration, Utc};

    fn promotion(id: &str, name: &str) -> Promotion {
        Promotion {
            id: Some(id.to_string()),
            doc_type: Promotion::TYPE.to_string(),
            product_name: name.to_string(),
            slug: Slug::new(crate::slug::generate_slug(name)),
            description: String::new(),
            original_price: 10.0,
            current_price: 8.0,
            category: None,
            valid_until: Utc::now() + ChronoDuration::days(7),
            created_at: Utc::now(),
            image: None,
        }
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.insert_promotion(promotion("promotion-a", "Adubo"));
        store.insert_promotion(promotion("promotion-b", "Sementes"));
        store
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let store = seeded_store();
        let list = DocumentList::<Promotion>::new(store.clone());

        list.refresh().await.unwrap();
        assert_eq!(list.entries().await.len(), 2);

        store.insert_promotion(promotion("promotion-c", "Ferramentas"));
        list.on_saved().await.unwrap();
        assert_eq!(list.entries().await.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let store = seeded_store();
        let mut list = DocumentList::<Promotion>::new(store.clone());
        list.refresh().await.unwrap();

        // Never requested: refused, nothing sent.
        let result = list.confirm_delete("promotion-a").await;
        assert!(matches!(result, Err(CoopervalError::DeleteNotConfirmed(_))));
        assert_eq!(store.delete_calls(), 0);

        // Requested for a different entry: still refused.
        list.request_delete("promotion-b");
        let result = list.confirm_delete("promotion-a").await;
        assert!(matches!(result, Err(CoopervalError::DeleteNotConfirmed(_))));
        assert_eq!(store.delete_calls(), 0);

        list.cancel_delete();
        assert!(list.pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_confirmed_delete_is_optimistic_then_reconciled() {
        let store = seeded_store();
        let mut list =
            DocumentList::<Promotion>::with_refetch_delay(store.clone(), Duration::from_millis(10));
        list.refresh().await.unwrap();
        let fetches_before = store.fetch_calls();

        list.request_delete("promotion-a");
        list.confirm_delete("promotion-a").await.unwrap();

        // Gone immediately, before any re-fetch ran.
        let ids: Vec<_> = list
            .entries()
            .await
            .iter()
            .map(|p| p.id.clone().unwrap())
            .collect();
        assert!(!ids.contains(&"promotion-a".to_string()));
        assert_eq!(store.fetch_calls(), fetches_before);

        // Still gone after the delayed authoritative re-fetch.
        list.settle().await;
        assert_eq!(store.fetch_calls(), fetches_before + 1);
        let ids: Vec<_> = list
            .entries()
            .await
            .iter()
            .map(|p| p.id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["promotion-b".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_unchanged() {
        let store = seeded_store();
        let mut list = DocumentList::<Promotion>::new(store.clone());
        list.refresh().await.unwrap();

        store.set_fail_writes(true);
        list.request_delete("promotion-a");
        let result = list.confirm_delete("promotion-a").await;
        assert!(result.is_err());

        assert_eq!(list.entries().await.len(), 2);
        // The request survives the failure so the user can retry.
        assert_eq!(list.pending_delete(), Some("promotion-a"));

        store.set_fail_writes(false);
        list.confirm_delete("promotion-a").await.unwrap();
        list.settle().await;
        assert_eq!(list.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_discards_scheduled_refetch() {
        let store = seeded_store();
        let mut list =
            DocumentList::<Promotion>::with_refetch_delay(store.clone(), Duration::from_millis(50));
        list.refresh().await.unwrap();

        list.request_delete("promotion-a");
        list.confirm_delete("promotion-a").await.unwrap();
        let fetches = store.fetch_calls();
        list.shutdown();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.fetch_calls(), fetches, "aborted re-fetch must not run");
    }
}
