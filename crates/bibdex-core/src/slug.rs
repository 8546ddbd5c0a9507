//! URL-safe slug derivation for author names.

use unicode_normalization::UnicodeNormalization;

/// Fold a name to a URL-safe slug.
///
/// NFKD-decomposes so accented letters reduce to their ASCII base, drops
/// everything else non-ASCII, lowercases, and joins the remaining word
/// runs with single hyphens. Can return an empty string for names with no
/// ASCII-representable characters; uniqueness probing in the store handles
/// that like any other collision.
pub fn slugify(name: &str) -> String {
    let cleaned: String = name
        .nfkd()
        .filter(|c| {
            c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_ascii_whitespace()
        })
        .map(|c| c.to_ascii_lowercase())
        .collect();

    cleaned
        .split(|c: char| c.is_ascii_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Ada Lovelace"), "ada-lovelace");
    }

    #[test]
    fn folds_accents() {
        assert_eq!(slugify("Émile Müller"), "emile-muller");
    }

    #[test]
    fn drops_punctuation() {
        assert_eq!(slugify("O'Brien, Patrick J."), "obrien-patrick-j");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("  van der--Berg  "), "van-der-berg");
    }

    #[test]
    fn keeps_underscores() {
        assert_eq!(slugify("user_name"), "user_name");
    }

    #[test]
    fn unrepresentable_name_gives_empty_slug() {
        assert_eq!(slugify("音楽"), "");
    }
}
