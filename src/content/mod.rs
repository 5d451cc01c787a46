mod news;
mod promotion;

pub use news::{News, NewsImage};
pub use promotion::{days_remaining, discount_percent, Category, Promotion};

use serde::{Deserialize, Serialize};

/// The two document kinds managed by the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    News,
    Promotion,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::News => write!(f, "news"),
            DocumentKind::Promotion => write!(f, "promotion"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "news" => Ok(DocumentKind::News),
            "promotion" | "promotions" => Ok(DocumentKind::Promotion),
            _ => Err(format!("Invalid document kind: {}", s)),
        }
    }
}

/// URL slug wrapper, stored as `{_type: "slug", current}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(rename = "_type", default = "slug_type")]
    type_tag: String,
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            type_tag: slug_type(),
            current: current.into(),
        }
    }
}

fn slug_type() -> String {
    "slug".to_string()
}

/// Reference to an uploaded asset owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_type", default = "reference_type")]
    type_tag: String,
    #[serde(rename = "_ref")]
    pub asset_id: String,
}

fn reference_type() -> String {
    "reference".to_string()
}

/// Image field embedding an asset reference, never raw binary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(rename = "_type", default = "image_type")]
    type_tag: String,
    pub asset: AssetRef,
}

impl ImageRef {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            type_tag: image_type(),
            asset: AssetRef {
                type_tag: reference_type(),
                asset_id: asset_id.into(),
            },
        }
    }
}

pub(crate) fn image_type() -> String {
    "image".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        assert_eq!("news".parse::<DocumentKind>().unwrap(), DocumentKind::News);
        assert_eq!(
            "promotions".parse::<DocumentKind>().unwrap(),
            DocumentKind::Promotion
        );
        assert!("page".parse::<DocumentKind>().is_err());
        assert_eq!(DocumentKind::Promotion.to_string(), "promotion");
    }

    #[test]
    fn test_image_ref_shape() {
        let image = ImageRef::new("image-abc-800x600-jpg");
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["_type"], "image");
        assert_eq!(json["asset"]["_type"], "reference");
        assert_eq!(json["asset"]["_ref"], "image-abc-800x600-jpg");
    }

    #[test]
    fn test_slug_shape() {
        let slug = Slug::new("adubo-organico-50kg");
        let json = serde_json::to_value(&slug).unwrap();
        assert_eq!(json["_type"], "slug");
        assert_eq!(json["current"], "adubo-organico-50kg");
    }
}
