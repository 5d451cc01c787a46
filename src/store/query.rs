//! Fixed GROQ queries issued against the content lake.

/// All news, ordered by publication date.
pub const ALL_NEWS: &str = r#"*[_type == "news"] | order(publishedAt desc)"#;

/// The five most recent news articles.
pub const RECENT_NEWS: &str = r#"*[_type == "news"] | order(publishedAt desc)[0..4]"#;

/// All promotions, ordered by validity date.
pub const ALL_PROMOTIONS: &str = r#"*[_type == "promotion"] | order(validUntil desc)"#;

/// A single news article addressed by slug.
pub fn news_by_slug(slug: &str) -> String {
    format!(r#"*[_type == "news" && slug.current == "{}"][0]"#, slug)
}
