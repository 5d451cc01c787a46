//! Pure filter projections over cached document lists.
//!
//! Recomputed from scratch on every input change; the cached lists are
//! never mutated here. Input order is preserved.

use chrono::{DateTime, Utc};

use crate::content::{Category, News, Promotion};

/// Active filter state of a listing view.
#[derive(Debug, Default, Clone)]
pub struct SearchFilter {
    /// Free-text term, matched case-insensitively as a substring.
    /// `None` or an empty string matches everything.
    pub term: Option<String>,
    /// Exact category label. `None` means "no category filter", which
    /// is not the same as filtering for uncategorized documents (there
    /// is no way to do that).
    pub category: Option<String>,
    /// Keep only promotions whose validity has not passed. Ignored for
    /// news.
    pub active_only: bool,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A term-only filter, as typed into the admin search box.
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.term.as_deref().map_or(true, str::is_empty)
            && self.category.is_none()
            && !self.active_only
    }
}

/// Project the visible news subset: term matches title or excerpt.
pub fn filter_news<'a>(items: &'a [News], filter: &SearchFilter) -> Vec<&'a News> {
    items
        .iter()
        .filter(|n| matches_term(filter, &[&n.title, &n.excerpt]))
        .filter(|n| matches_category(filter, n.category.as_deref()))
        .collect()
}

/// Project the visible promotion subset: term matches product name or
/// description; `active_only` keeps `validUntil >= now` (inclusive).
pub fn filter_promotions<'a>(
    items: &'a [Promotion],
    filter: &SearchFilter,
    now: DateTime<Utc>,
) -> Vec<&'a Promotion> {
    items
        .iter()
        .filter(|p| matches_term(filter, &[&p.product_name, &p.description]))
        .filter(|p| {
            let label = p.category.map(|c| c.to_string());
            matches_category(filter, label.as_deref())
        })
        .filter(|p| !filter.active_only || p.is_active(now))
        .collect()
}

/// Distinct categories present in a promotion list, in first-appearance
/// order, for the public page's filter buttons.
pub fn promotion_categories(items: &[Promotion]) -> Vec<Category> {
    let mut seen = Vec::new();
    for category in items.iter().filter_map(|p| p.category) {
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}

fn matches_term(filter: &SearchFilter, fields: &[&str]) -> bool {
    let Some(term) = filter.term.as_deref() else {
        return true;
    };
    let needle = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

fn matches_category(filter: &SearchFilter, value: Option<&str>) -> bool {
    match filter.category.as_deref() {
        None => true,
        Some(selected) => value == Some(selected),
    }
}
