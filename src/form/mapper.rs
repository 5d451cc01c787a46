//! Form state → persistable document records.
//!
//! The mappers always rebuild the complete document: the slug is
//! recomputed from the current title on every call, so renaming a
//! document changes its slug on the next successful submission.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{NewsFields, PromotionFields};
use crate::content::{ImageRef, News, NewsImage, Promotion, Slug};
use crate::error::{CoopervalError, Result};
use crate::slug::generate_slug;

/// Widen a date-only field (`YYYY-MM-DD`) to a midnight-UTC timestamp.
fn parse_date_utc(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoopervalError::InvalidDate(value.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| CoopervalError::InvalidDate(value.to_string()))?;
    Ok(DateTime::from_naive_utc_and_offset(midnight, Utc))
}

/// Build the full promotion record from form state.
///
/// `image` is a reference to a freshly uploaded asset, if any; when it
/// is absent the field is omitted entirely, so a set-style patch keeps
/// whatever image the stored document already has. An empty or
/// unrecognized category is likewise treated as unset.
pub fn promotion_document(
    fields: &PromotionFields,
    image: Option<ImageRef>,
) -> Result<Promotion> {
    Ok(Promotion {
        id: None,
        doc_type: Promotion::TYPE.to_string(),
        product_name: fields.product_name.clone(),
        slug: Slug::new(generate_slug(&fields.product_name)),
        description: fields.description.clone(),
        original_price: fields.original_price,
        current_price: fields.current_price,
        category: fields.category.trim().parse().ok(),
        valid_until: parse_date_utc(&fields.valid_until)?,
        created_at: Utc::now(),
        image,
    })
}

/// Build the full news record from form state. `images` is the ordered
/// gallery: existing references first, then freshly uploaded ones.
pub fn news_document(fields: &NewsFields, images: Vec<NewsImage>) -> Result<News> {
    Ok(News {
        id: None,
        doc_type: News::TYPE.to_string(),
        title: fields.title.clone(),
        slug: Slug::new(generate_slug(&fields.title)),
        excerpt: fields.excerpt.clone(),
        content: text_blocks(&fields.content),
        images,
        published_at: parse_date_utc(&fields.published_at)?,
        author: none_if_empty(&fields.author),
        category: none_if_empty(&fields.category),
    })
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Render plain text into portable-text blocks, one per paragraph.
fn text_blocks(content: &str) -> Vec<Value> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| {
            json!({
                "_type": "block",
                "_key": Uuid::new_v4().simple().to_string(),
                "style": "normal",
                "markDefs": [],
                "children": [{
                    "_type": "span",
                    "_key": Uuid::new_v4().simple().to_string(),
                    "text": paragraph,
                    "marks": [],
                }],
            })
        })
        .collect()
}
