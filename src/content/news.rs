// src/content/news.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{image_type, AssetRef, Slug};

/// News article document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    /// Assigned by the store on creation; absent on create payloads.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_type", default = "news_type")]
    pub doc_type: String,
    pub title: String,
    pub slug: Slug,
    pub excerpt: String,
    /// Rich text as an ordered sequence of portable-text blocks.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
    #[serde(default)]
    pub images: Vec<NewsImage>,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn news_type() -> String {
    "news".to_string()
}

impl News {
    pub const TYPE: &'static str = "news";

    /// Flatten the portable-text blocks back into plain text, one
    /// paragraph per block.
    pub fn body_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.get("children")?.as_array())
            .map(|children| {
                children
                    .iter()
                    .filter_map(|span| span.get("text")?.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Entry in a news article's image gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsImage {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type", default = "image_type")]
    type_tag: String,
    pub asset: AssetRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl NewsImage {
    /// Wrap an uploaded asset id as a keyed gallery entry.
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            key: uuid::Uuid::new_v4().simple().to_string(),
            type_tag: image_type(),
            asset: AssetRef {
                type_tag: super::reference_type(),
                asset_id: asset_id.into(),
            },
            alt: None,
        }
    }
}
