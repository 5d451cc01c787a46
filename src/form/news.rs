// src/form/news.rs
use chrono::Utc;

use super::{mapper, StagedUpload, SubmitOutcome, SubmitState};
use crate::content::{News, NewsImage};
use crate::error::Result;
use crate::store::ContentStore;

/// Editable field set of the news form.
#[derive(Debug, Clone, Default)]
pub struct NewsFields {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    pub published_at: String,
}

/// Controller for creating and editing news articles.
#[derive(Debug, Default)]
pub struct NewsForm {
    pub fields: NewsFields,
    staged_images: Vec<StagedUpload>,
    existing: Option<News>,
    state: SubmitState,
}

impl NewsForm {
    /// Start a blank form; the publication date defaults to today.
    pub fn new() -> Self {
        Self {
            fields: NewsFields {
                published_at: Utc::now().format("%Y-%m-%d").to_string(),
                ..NewsFields::default()
            },
            ..Self::default()
        }
    }

    /// Start an edit form pre-populated from a stored article. The
    /// existing image gallery is carried over; newly staged images are
    /// appended to it on submit.
    pub fn edit(existing: News) -> Self {
        let fields = NewsFields {
            title: existing.title.clone(),
            excerpt: existing.excerpt.clone(),
            content: existing.body_text(),
            author: existing.author.clone().unwrap_or_default(),
            category: existing.category.clone().unwrap_or_default(),
            published_at: existing.published_at.format("%Y-%m-%d").to_string(),
        };

        Self {
            fields,
            staged_images: Vec::new(),
            existing: Some(existing),
            state: SubmitState::Idle,
        }
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    /// Return to `Idle` once the outcome has been shown to the user.
    pub fn acknowledge(&mut self) {
        self.state = SubmitState::Idle;
    }

    /// Apply a single field change; everything is text. Unknown names
    /// are ignored.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "title" => self.fields.title = value.to_string(),
            "excerpt" => self.fields.excerpt = value.to_string(),
            "content" => self.fields.content = value.to_string(),
            "author" => self.fields.author = value.to_string(),
            "category" => self.fields.category = value.to_string(),
            "publishedAt" => self.fields.published_at = value.to_string(),
            _ => {}
        }
    }

    /// Stage a gallery image to upload on the next submit.
    pub fn stage_image(&mut self, bytes: Vec<u8>, filename: impl Into<String>) {
        self.staged_images.push(StagedUpload {
            bytes,
            filename: filename.into(),
        });
    }

    /// Persist the form: upload every staged image in order, rebuild
    /// the document, then create or patch depending on edit mode. Any
    /// upload failure aborts the whole submission. Re-entrant calls
    /// while `Submitting` are ignored; a failed submission keeps all
    /// field values.
    pub async fn submit(&mut self, store: &dyn ContentStore) -> Result<SubmitOutcome> {
        if self.state == SubmitState::Submitting {
            return Ok(SubmitOutcome::Ignored);
        }
        self.state = SubmitState::Submitting;

        let mut images: Vec<NewsImage> = self
            .existing
            .as_ref()
            .map(|n| n.images.clone())
            .unwrap_or_default();

        for staged in self.staged_images.clone() {
            match store.upload_asset(staged.bytes, &staged.filename).await {
                Ok(asset_id) => images.push(NewsImage::new(asset_id)),
                Err(e) => {
                    tracing::warn!("image upload failed: {e}");
                    self.state = SubmitState::Failed(e.to_string());
                    return Err(e);
                }
            }
        }

        let doc = match mapper::news_document(&self.fields, images) {
            Ok(doc) => doc,
            Err(e) => {
                self.state = SubmitState::Failed(e.to_string());
                return Err(e);
            }
        };

        let existing_id = self.existing.as_ref().and_then(|n| n.id.clone());
        let result = match existing_id {
            Some(id) => store.patch_news(&id, &doc).await.map(|()| id),
            None => store.create_news(&doc).await,
        };

        match result {
            Ok(id) => {
                self.state = SubmitState::Succeeded;
                self.staged_images.clear();
                Ok(SubmitOutcome::Saved(id))
            }
            Err(e) => {
                tracing::warn!("saving news failed: {e}");
                self.state = SubmitState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn filled_form() -> NewsForm {
        let mut form = NewsForm::new();
        form.set_field("title", "Nova safra de milho");
        form.set_field("excerpt", "Produtores comemoram resultado");
        form.set_field("content", "Primeiro parágrafo.\n\nSegundo parágrafo.");
        form.set_field("author", "Equipe Cooperval");
        form.set_field("publishedAt", "2026-08-01");
        form
    }

    #[tokio::test]
    async fn test_submit_creates_article() {
        let store = MemoryStore::new();
        let mut form = filled_form();

        let outcome = form.submit(&store).await.unwrap();
        let SubmitOutcome::Saved(id) = outcome else {
            panic!("expected a saved document");
        };
        assert!(id.starts_with("news-"));

        let all = store.fetch_news().await.unwrap();
        assert_eq!(all[0].title, "Nova safra de milho");
        assert_eq!(all[0].content.len(), 2);
    }

    #[tokio::test]
    async fn test_staged_images_upload_in_order() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        form.stage_image(vec![1], "primeira.jpg");
        form.stage_image(vec![2], "segunda.jpg");

        form.submit(&store).await.unwrap();
        assert_eq!(store.upload_calls(), 2);
        assert_eq!(store.uploaded_filenames(), vec!["primeira.jpg", "segunda.jpg"]);

        let all = store.fetch_news().await.unwrap();
        assert_eq!(all[0].images.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_submission() {
        let store = MemoryStore::new();
        store.set_fail_uploads(true);

        let mut form = filled_form();
        form.stage_image(vec![1], "primeira.jpg");

        assert!(form.submit(&store).await.is_err());
        assert_eq!(store.create_calls(), 0);
        assert!(matches!(form.state(), SubmitState::Failed(_)));
    }

    #[tokio::test]
    async fn test_edit_changes_slug_with_title() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        let SubmitOutcome::Saved(id) = form.submit(&store).await.unwrap() else {
            panic!("expected a saved document");
        };

        let stored = store.fetch_news().await.unwrap().remove(0);
        let mut edit = NewsForm::edit(stored);
        assert_eq!(edit.fields.content, "Primeiro parágrafo.\n\nSegundo parágrafo.");
        edit.set_field("title", "Safra recorde de milho");

        edit.submit(&store).await.unwrap();
        assert_eq!(store.patch_calls(), 1);

        let updated = store
            .fetch_news()
            .await
            .unwrap()
            .into_iter()
            .find(|n| n.id.as_deref() == Some(id.as_str()))
            .unwrap();
        assert_eq!(updated.slug.current, "safra-recorde-de-milho");
        assert_eq!(updated.title, "Safra recorde de milho");
    }

    #[tokio::test]
    async fn test_submit_while_submitting_is_ignored() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        form.state = SubmitState::Submitting;

        assert_eq!(form.submit(&store).await.unwrap(), SubmitOutcome::Ignored);
        assert_eq!(store.create_calls(), 0);
    }
}
