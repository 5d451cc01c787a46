//! Slug derivation for document URLs.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive a URL-safe slug from a display title.
///
/// Lowercases the input, decomposes it (NFD) and drops combining marks,
/// removes everything that is not a word character, whitespace or a
/// hyphen, then collapses whitespace and hyphen runs into single
/// hyphens. Deterministic and idempotent; an empty input yields an
/// empty slug. Uniqueness across documents is not guaranteed here — the
/// store only enforces uniqueness of `_id`.
pub fn generate_slug(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut run = false;
    for c in stripped.chars() {
        if c.is_whitespace() || c == '-' {
            if !run {
                slug.push('-');
                run = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            run = false;
        }
        // anything else is dropped without breaking a hyphen run
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_punctuation() {
        assert_eq!(generate_slug("Adubo Orgânico 50kg!!"), "adubo-organico-50kg");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(generate_slug("Ração Premium"), "racao-premium");
    }

    #[test]
    fn test_collapses_runs() {
        assert_eq!(generate_slug("a  -  b---c"), "a-b-c");
    }

    #[test]
    fn test_keeps_underscores() {
        assert_eq!(generate_slug("lote_42 especial"), "lote_42-especial");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(generate_slug(""), "");
    }

    #[test]
    fn test_idempotent() {
        for text in [
            "Adubo Orgânico 50kg!!",
            "  Sementes de Milho  ",
            "café & açúcar",
            "--já--",
            "",
        ] {
            let once = generate_slug(text);
            assert_eq!(generate_slug(&once), once, "not idempotent for {text:?}");
        }
    }
}
