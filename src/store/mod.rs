pub mod http;
pub mod memory;
pub mod query;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::content::{News, Promotion};
use crate::error::Result;

/// Boundary to the hosted document store.
///
/// All persistence, querying and asset handling happen behind this
/// trait; the admin components receive it as an injected handle so a
/// test double can stand in for the remote service.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a new news document. Returns the id assigned by the store.
    async fn create_news(&self, doc: &News) -> Result<String>;

    /// Overwrite the provided fields of an existing news document.
    /// Fields absent from `doc` keep their stored values.
    async fn patch_news(&self, id: &str, doc: &News) -> Result<()>;

    /// Persist a new promotion document. Returns the assigned id.
    async fn create_promotion(&self, doc: &Promotion) -> Result<String>;

    /// Overwrite the provided fields of an existing promotion document.
    async fn patch_promotion(&self, id: &str, doc: &Promotion) -> Result<()>;

    /// Remove a document of either kind. Irreversible.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Upload a binary asset and return its opaque reference id. Size
    /// and format limits are enforced by the store, not here.
    async fn upload_asset(&self, bytes: Vec<u8>, filename: &str) -> Result<String>;

    /// All news, newest publication first.
    async fn fetch_news(&self) -> Result<Vec<News>>;

    /// The five most recent news articles.
    async fn fetch_recent_news(&self) -> Result<Vec<News>>;

    /// A single news article addressed by its slug.
    async fn fetch_news_by_slug(&self, slug: &str) -> Result<Option<News>>;

    /// All promotions, latest validity first.
    async fn fetch_promotions(&self) -> Result<Vec<Promotion>>;
}
