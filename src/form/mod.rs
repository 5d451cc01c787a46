mod mapper;
mod news;
mod promotion;

pub use mapper::{news_document, promotion_document};
pub use news::{NewsFields, NewsForm};
pub use promotion::{PromotionFields, PromotionForm};

/// Submission lifecycle of a form controller.
///
/// `Submitting` guards against re-entrant submits; `Failed` keeps the
/// reason so it can be shown to the user while the field values stay
/// intact for a retry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// What a call to `submit` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The document was persisted under this id.
    Saved(String),
    /// A submission was already in flight; no remote call was made.
    Ignored,
}

/// Binary staged for upload at submit time. Only the reference returned
/// by the store ends up in the document.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Price-field coercion: unparsable input silently becomes zero. This
/// mirrors the form's historical behavior and is relied upon by the
/// mapper, which never raises for prices.
pub(crate) fn parse_price(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_fallback() {
        assert_eq!(parse_price("12.50"), 12.5);
        assert_eq!(parse_price(" 7 "), 7.0);
        assert_eq!(parse_price("abc"), 0.0);
        assert_eq!(parse_price(""), 0.0);
    }
}
