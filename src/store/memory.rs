//! In-memory `ContentStore` used as a substitutable test double.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use super::ContentStore;
use crate::content::{News, Promotion};
use crate::error::{CoopervalError, Result};

/// Stores documents in memory and counts every remote call, so tests
/// can assert on exactly which operations were issued. Write, upload
/// and read failures can be injected to drive the error paths.
#[derive(Default)]
pub struct MemoryStore {
    news: Mutex<Vec<News>>,
    promotions: Mutex<Vec<Promotion>>,
    assets: Mutex<Vec<String>>,
    create_calls: AtomicUsize,
    patch_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    fail_writes: AtomicBool,
    fail_uploads: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a news document without going through `create_news`.
    pub fn insert_news(&self, doc: News) {
        self.news.lock().unwrap().push(doc);
    }

    /// Seed a promotion document without going through `create_promotion`.
    pub fn insert_promotion(&self, doc: Promotion) {
        self.promotions.lock().unwrap().push(doc);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn patch_calls(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn uploaded_filenames(&self) -> Vec<String> {
        self.assets.lock().unwrap().clone()
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoopervalError::RemoteWrite("injected write failure".into()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoopervalError::RemoteRead("injected read failure".into()));
        }
        Ok(())
    }
}

/// Overlay the provided fields of `patch` onto `base`, leaving fields
/// the patch omits untouched — the store's set-style partial update.
fn merge_set(base: &mut Value, patch: &Value) {
    if let (Some(base_map), Some(patch_map)) = (base.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_map {
            base_map.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_news(&self, doc: &News) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;

        let id = format!("news-{}", Uuid::new_v4().simple());
        let mut stored = doc.clone();
        stored.id = Some(id.clone());
        self.news.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn patch_news(&self, id: &str, doc: &News) -> Result<()> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;

        let mut news = self.news.lock().unwrap();
        let existing = news
            .iter_mut()
            .find(|n| n.id.as_deref() == Some(id))
            .ok_or_else(|| CoopervalError::RemoteWrite(format!("no document with id {id}")))?;

        let mut base = serde_json::to_value(&*existing)?;
        merge_set(&mut base, &serde_json::to_value(doc)?);
        *existing = serde_json::from_value(base)?;
        Ok(())
    }

    async fn create_promotion(&self, doc: &Promotion) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;

        let id = format!("promotion-{}", Uuid::new_v4().simple());
        let mut stored = doc.clone();
        stored.id = Some(id.clone());
        self.promotions.lock().unwrap().push(stored);
        Ok(id)
    }

    async fn patch_promotion(&self, id: &str, doc: &Promotion) -> Result<()> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;

        let mut promotions = self.promotions.lock().unwrap();
        let existing = promotions
            .iter_mut()
            .find(|p| p.id.as_deref() == Some(id))
            .ok_or_else(|| CoopervalError::RemoteWrite(format!("no document with id {id}")))?;

        let mut base = serde_json::to_value(&*existing)?;
        merge_set(&mut base, &serde_json::to_value(doc)?);
        *existing = serde_json::from_value(base)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_write()?;

        let mut news = self.news.lock().unwrap();
        if let Some(pos) = news.iter().position(|n| n.id.as_deref() == Some(id)) {
            news.remove(pos);
            return Ok(());
        }
        drop(news);

        let mut promotions = self.promotions.lock().unwrap();
        if let Some(pos) = promotions.iter().position(|p| p.id.as_deref() == Some(id)) {
            promotions.remove(pos);
            return Ok(());
        }

        Err(CoopervalError::RemoteWrite(format!("no document with id {id}")))
    }

    async fn upload_asset(&self, _bytes: Vec<u8>, filename: &str) -> Result<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(CoopervalError::RemoteUpload("injected upload failure".into()));
        }

        self.assets.lock().unwrap().push(filename.to_string());
        Ok(format!("image-{}", Uuid::new_v4().simple()))
    }

    async fn fetch_news(&self) -> Result<Vec<News>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;

        let mut all = self.news.lock().unwrap().clone();
        all.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(all)
    }

    async fn fetch_recent_news(&self) -> Result<Vec<News>> {
        let mut all = self.fetch_news().await?;
        all.truncate(5);
        Ok(all)
    }

    async fn fetch_news_by_slug(&self, slug: &str) -> Result<Option<News>> {
        let all = self.fetch_news().await?;
        Ok(all.into_iter().find(|n| n.slug.current == slug))
    }

    async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;

        let mut all = self.promotions.lock().unwrap().clone();
        all.sort_by(|a, b| b.valid_until.cmp(&a.valid_until));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Slug;
    use chrono::{Duration, Utc};

    fn promotion(name: &str, valid_in_days: i64) -> Promotion {
        Promotion {
            id: None,
            doc_type: Promotion::TYPE.to_string(),
            product_name: name.to_string(),
            slug: Slug::new(crate::slug::generate_slug(name)),
            description: String::new(),
            original_price: 10.0,
            current_price: 8.0,
            category: None,
            valid_until: Utc::now() + Duration::days(valid_in_days),
            created_at: Utc::now(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_orders_by_validity() {
        let store = MemoryStore::new();
        store.create_promotion(&promotion("A", 1)).await.unwrap();
        store.create_promotion(&promotion("B", 5)).await.unwrap();

        let all = store.fetch_promotions().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].product_name, "B");
        assert!(all[0].id.is_some());
        assert_eq!(store.create_calls(), 2);
    }

    #[tokio::test]
    async fn test_patch_merges_omitted_fields() {
        let store = MemoryStore::new();
        let mut doc = promotion("A", 1);
        doc.category = Some(crate::content::Category::Adubo);
        let id = store.create_promotion(&doc).await.unwrap();

        // A patch without a category keeps the stored one.
        let update = promotion("A+", 2);
        store.patch_promotion(&id, &update).await.unwrap();

        let all = store.fetch_promotions().await.unwrap();
        assert_eq!(all[0].product_name, "A+");
        assert_eq!(all[0].category, Some(crate::content::Category::Adubo));
    }

    #[tokio::test]
    async fn test_patch_unknown_id_fails() {
        let store = MemoryStore::new();
        let result = store.patch_promotion("promotion-missing", &promotion("A", 1)).await;
        assert!(matches!(result, Err(CoopervalError::RemoteWrite(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails() {
        let store = MemoryStore::new();
        let result = store.delete("news-missing").await;
        assert!(matches!(result, Err(CoopervalError::RemoteWrite(_))));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.create_promotion(&promotion("A", 1)).await.is_err());

        store.set_fail_uploads(true);
        let result = store.upload_asset(vec![1, 2, 3], "foto.jpg").await;
        assert!(matches!(result, Err(CoopervalError::RemoteUpload(_))));
    }
}
