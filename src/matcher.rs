//! Separator-insensitive substring matching used by search.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

fn is_separator(c: char) -> bool {
    matches!(c, '-' | '_' | '.') || c.is_whitespace()
}

/// Case-fold, strip diacritics and delete separators.
///
/// `"E-Portal"`, `"e_portal"`, `"e portal"` and `"éportal"` all become `"eportal"`.
pub fn normalize(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c) && !is_separator(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// True when the normalized `candidate` contains the normalized `query`.
pub fn matches(query: &str, candidate: &str) -> bool {
    let query = normalize(query);
    query.is_empty() || normalize(candidate).contains(&query)
}

/// Query normalized once, for scanning many candidates.
#[derive(Debug, Clone)]
pub struct Matcher {
    needle: String,
}

impl Matcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: normalize(query),
        }
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.needle.is_empty() || normalize(candidate).contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_accents_and_separators() {
        assert_eq!(normalize("Café Über-Tool"), "cafeubertool");
        assert_eq!(normalize("my_project.v2"), "myprojectv2");
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("", "anything"));
        assert!(matches(" - ", "anything"));
    }

    #[test]
    fn matcher_agrees_with_matches() {
        let m = Matcher::new("E Portal");
        assert!(m.is_match("my-eportal-app"));
        assert!(!m.is_match("portal"));
    }
}
