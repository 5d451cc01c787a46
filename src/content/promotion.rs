// src/content/promotion.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ImageRef, Slug};

/// WhatsApp number the public "Saiba Mais" button points at.
const INQUIRY_NUMBER: &str = "5555999999999";

/// Product category vocabulary from the promotion form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Sementes,
    Adubo,
    Ferramentas,
    #[serde(rename = "Ração")]
    Racao,
    Medicamentos,
    Outros,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Sementes => write!(f, "Sementes"),
            Category::Adubo => write!(f, "Adubo"),
            Category::Ferramentas => write!(f, "Ferramentas"),
            Category::Racao => write!(f, "Ração"),
            Category::Medicamentos => write!(f, "Medicamentos"),
            Category::Outros => write!(f, "Outros"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sementes" => Ok(Category::Sementes),
            "adubo" => Ok(Category::Adubo),
            "ferramentas" => Ok(Category::Ferramentas),
            "ração" | "racao" => Ok(Category::Racao),
            "medicamentos" => Ok(Category::Medicamentos),
            "outros" => Ok(Category::Outros),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

/// Product promotion document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Assigned by the store on creation; absent on create payloads.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_type", default = "promotion_type")]
    pub doc_type: String,
    pub product_name: String,
    pub slug: Slug,
    pub description: String,
    pub original_price: f64,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

fn promotion_type() -> String {
    "promotion".to_string()
}

impl Promotion {
    pub const TYPE: &'static str = "promotion";

    /// A promotion is active while its validity date has not passed.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.valid_until >= now
    }

    /// Rounded discount percentage for display.
    pub fn discount_percent(&self) -> i64 {
        discount_percent(self.original_price, self.current_price)
    }

    /// Whole days until expiry, rounded up. Non-positive means expired.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        days_remaining(self.valid_until, now)
    }

    /// Messaging deep link for the public listing. The product name is
    /// embedded as-is; the messaging service tolerates raw text.
    pub fn inquiry_link(&self) -> String {
        format!(
            "https://wa.me/{}?text=Olá! Gostaria de saber mais sobre a promoção: {}",
            INQUIRY_NUMBER, self.product_name
        )
    }
}

/// `round(((original - current) / original) * 100)`, with a zero
/// original price treated as no discount rather than dividing by zero.
/// A current price above the original yields a negative value; callers
/// only show the badge when the result is positive.
pub fn discount_percent(original: f64, current: f64) -> i64 {
    if original == 0.0 {
        return 0;
    }
    (((original - current) / original) * 100.0).round() as i64
}

/// Ceiling of the remaining validity window in days.
pub fn days_remaining(valid_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (valid_until - now).num_seconds() as f64;
    (seconds / 86_400.0).ceil() as i64
}
