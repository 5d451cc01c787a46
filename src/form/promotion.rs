// src/form/promotion.rs
use super::{mapper, parse_price, StagedUpload, SubmitOutcome, SubmitState};
use crate::content::{ImageRef, Promotion};
use crate::error::Result;
use crate::store::ContentStore;

/// Editable field set of the promotion form. Prices are kept already
/// coerced; dates stay in date-only text form until mapping.
#[derive(Debug, Clone, Default)]
pub struct PromotionFields {
    pub product_name: String,
    pub description: String,
    pub original_price: f64,
    pub current_price: f64,
    pub category: String,
    pub valid_until: String,
}

/// Controller for creating and editing promotions.
#[derive(Debug, Default)]
pub struct PromotionForm {
    pub fields: PromotionFields,
    staged_image: Option<StagedUpload>,
    existing: Option<Promotion>,
    state: SubmitState,
}

impl PromotionForm {
    /// Start a blank form for a new promotion.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an edit form pre-populated from a stored promotion.
    pub fn edit(existing: Promotion) -> Self {
        let fields = PromotionFields {
            product_name: existing.product_name.clone(),
            description: existing.description.clone(),
            original_price: existing.original_price,
            current_price: existing.current_price,
            category: existing
                .category
                .map(|c| c.to_string())
                .unwrap_or_default(),
            valid_until: existing.valid_until.format("%Y-%m-%d").to_string(),
        };

        Self {
            fields,
            staged_image: None,
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

    /// Apply a single field change. Price fields are coerced to a
    /// number (unparsable input becomes zero); everything else passes
    /// through as text. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match name {
            "productName" => self.fields.product_name = value.to_string(),
            "description" => self.fields.description = value.to_string(),
            "originalPrice" => self.fields.original_price = parse_price(value),
            "currentPrice" => self.fields.current_price = parse_price(value),
            "category" => self.fields.category = value.to_string(),
            "validUntil" => self.fields.valid_until = value.to_string(),
            _ => {}
        }
    }

    /// Stage a new product image to upload on the next submit.
    pub fn stage_image(&mut self, bytes: Vec<u8>, filename: impl Into<String>) {
        self.staged_image = Some(StagedUpload {
            bytes,
            filename: filename.into(),
        });
    }

    /// Persist the form: upload the staged image (if any), rebuild the
    /// document, then create or patch depending on edit mode.
    ///
    /// While a submission is in flight further calls are ignored. On
    /// failure the state carries the reason and every field value is
    /// retained for a retry.
    pub async fn submit(&mut self, store: &dyn ContentStore) -> Result<SubmitOutcome> {
        if self.state == SubmitState::Submitting {
            return Ok(SubmitOutcome::Ignored);
        }
        self.state = SubmitState::Submitting;

        let image = match self.staged_image.clone() {
            Some(staged) => match store.upload_asset(staged.bytes, &staged.filename).await {
                Ok(asset_id) => Some(ImageRef::new(asset_id)),
                Err(e) => {
                    tracing::warn!("image upload failed: {e}");
                    self.state = SubmitState::Failed(e.to_string());
                    return Err(e);
                }
            },
            None => None,
        };

        let doc = match mapper::promotion_document(&self.fields, image) {
            Ok(doc) => doc,
            Err(e) => {
                self.state = SubmitState::Failed(e.to_string());
                return Err(e);
            }
        };

        let existing_id = self.existing.as_ref().and_then(|p| p.id.clone());
        let result = match existing_id {
            Some(id) => store.patch_promotion(&id, &doc).await.map(|()| id),
            None => store.create_promotion(&doc).await,
        };

        match result {
            Ok(id) => {
                self.state = SubmitState::Succeeded;
                self.staged_image = None;
                Ok(SubmitOutcome::Saved(id))
            }
            Err(e) => {
                tracing::warn!("saving promotion failed: {e}");
                self.state = SubmitState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use crate::store::MemoryStore;

    fn filled_form() -> PromotionForm {
        let mut form = PromotionForm::new();
        form.set_field("productName", "Adubo Orgânico 50kg");
        form.set_field("description", "Direto do produtor");
        form.set_field("originalPrice", "100.00");
        form.set_field("currentPrice", "75.00");
        form.set_field("category", "Adubo");
        form.set_field("validUntil", "2026-09-15");
        form
    }

    #[test]
    fn test_price_coercion_is_silent() {
        let mut form = PromotionForm::new();
        form.set_field("originalPrice", "19.90");
        assert_eq!(form.fields.original_price, 19.9);

        form.set_field("originalPrice", "not a number");
        assert_eq!(form.fields.original_price, 0.0);

        form.set_field("unknownField", "ignored");
    }

    #[tokio::test]
    async fn test_submit_creates_new_promotion() {
        let store = MemoryStore::new();
        let mut form = filled_form();

        let outcome = form.submit(&store).await.unwrap();
        let SubmitOutcome::Saved(id) = outcome else {
            panic!("expected a saved document");
        };
        assert!(id.starts_with("promotion-"));
        assert_eq!(*form.state(), SubmitState::Succeeded);

        let all = store.fetch_promotions().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].category, Some(Category::Adubo));
    }

    #[tokio::test]
    async fn test_submit_while_submitting_is_ignored() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        form.state = SubmitState::Submitting;

        let outcome = form.submit(&store).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(store.create_calls(), 0);
        assert_eq!(store.patch_calls(), 0);
        assert_eq!(store.upload_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_submission() {
        let store = MemoryStore::new();
        store.set_fail_uploads(true);

        let mut form = filled_form();
        form.stage_image(vec![0xFF, 0xD8], "foto.jpg");

        let result = form.submit(&store).await;
        assert!(result.is_err());
        assert!(matches!(form.state(), SubmitState::Failed(_)));
        assert_eq!(store.create_calls(), 0, "persist must not start");
        // Field values are retained for a retry.
        assert_eq!(form.fields.product_name, "Adubo Orgânico 50kg");

        store.set_fail_uploads(false);
        form.acknowledge();
        assert!(form.submit(&store).await.is_ok());
        assert_eq!(store.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_edit_patches_and_recomputes_slug() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        let SubmitOutcome::Saved(id) = form.submit(&store).await.unwrap() else {
            panic!("expected a saved document");
        };

        let stored = store
            .fetch_promotions()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id.as_deref() == Some(id.as_str()))
            .unwrap();
        assert_eq!(stored.slug.current, "adubo-organico-50kg");

        let mut edit = PromotionForm::edit(stored);
        assert!(edit.is_editing());
        assert_eq!(edit.fields.valid_until, "2026-09-15");
        edit.set_field("productName", "Adubo Premium 25kg");

        let outcome = edit.submit(&store).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved(id.clone()));
        assert_eq!(store.patch_calls(), 1);
        assert_eq!(store.create_calls(), 1, "edit must not create");

        let updated = store
            .fetch_promotions()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id.as_deref() == Some(id.as_str()))
            .unwrap();
        assert_eq!(updated.slug.current, "adubo-premium-25kg");
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_fields() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let mut form = filled_form();
        assert!(form.submit(&store).await.is_err());
        assert!(matches!(form.state(), SubmitState::Failed(_)));
        assert_eq!(form.fields.description, "Direto do produtor");
        assert_eq!(form.fields.current_price, 75.0);
    }

    #[tokio::test]
    async fn test_invalid_date_fails_before_any_write() {
        let store = MemoryStore::new();
        let mut form = filled_form();
        form.set_field("validUntil", "soon");

        assert!(form.submit(&store).await.is_err());
        assert_eq!(store.create_calls(), 0);
        assert!(matches!(form.state(), SubmitState::Failed(_)));
    }
}
