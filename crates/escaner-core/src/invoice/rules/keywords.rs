//! Financial keyword matching.

/// Default keywords, in match priority order.
///
/// `subtotal` precedes `total` so a "Subtotal" line is labeled as such.
/// `total due` can never win over `total`; it is kept for configurations
/// that reorder the list.
pub const DEFAULT_KEYWORDS: [&str; 11] = [
    "base", "impuesto", "subtotal", "total", "iva", "neto", "tax", "amount", "value",
    "total due", "vat",
];

/// Case-insensitive substring matcher over an ordered keyword list.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
}

impl KeywordMatcher {
    /// Create a matcher over the default keywords.
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS)
    }

    /// Create a matcher over custom keywords. Order sets priority.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// First keyword contained in the trimmed, lower-cased line.
    pub fn find(&self, line: &str) -> Option<&str> {
        let clean = line.trim().to_lowercase();
        self.keywords
            .iter()
            .find(|kw| clean.contains(kw.as_str()))
            .map(String::as_str)
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_keyword_wins() {
        let matcher = KeywordMatcher::new();
        assert_eq!(matcher.find("SUBTOTAL / TOTAL 10.00"), Some("subtotal"));
        assert_eq!(matcher.find("Total due: 10.00"), Some("total"));
        assert_eq!(matcher.find("Base imponible"), Some("base"));
    }

    #[test]
    fn test_substring_match() {
        // "database" contains "base"
        assert_eq!(KeywordMatcher::new().find("database 12"), Some("base"));
        assert_eq!(KeywordMatcher::new().find("Gracias por su compra"), None);
    }

    #[test]
    fn test_custom_keywords_are_normalized() {
        let matcher = KeywordMatcher::with_keywords(["  Total Due ", "", "TOTAL"]);
        assert_eq!(matcher.keywords(), &["total due".to_string(), "total".to_string()]);
        assert_eq!(matcher.find("TOTAL DUE 5"), Some("total due"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("iva"), "Iva");
        assert_eq!(capitalize("total due"), "Total due");
        assert_eq!(capitalize("VAT"), "Vat");
        assert_eq!(capitalize(""), "");
    }
}
