//! Amount matching and normalization for invoice lines.

use super::patterns::{AMOUNT_PATTERN, CURRENCY_SYMBOLS};

/// Finds the first amount on a line and returns it normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First amount in `line`, normalized with [`normalize_amount`].
    pub fn extract(&self, line: &str) -> Option<String> {
        AMOUNT_PATTERN
            .find(line)
            .map(|m| normalize_amount(m.as_str()))
    }
}

/// Normalize a matched amount.
///
/// Every `,` becomes `.` first, then currency symbols are stripped and the
/// result trimmed. Grouping commas therefore turn into dots as well:
/// `1,234.56` normalizes to `1.234.56`.
pub fn normalize_amount(raw: &str) -> String {
    let dotted = raw.replace(',', ".");
    CURRENCY_SYMBOLS.replace_all(&dotted, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("1,234.56"), "1.234.56");
        assert_eq!(normalize_amount("21,00"), "21.00");
        assert_eq!(normalize_amount("100.00"), "100.00");
        assert_eq!(normalize_amount(" 45.00 $"), "45.00");
        assert_eq!(normalize_amount("US$12,50"), "12.50");
    }

    #[test]
    fn test_extract_first_amount() {
        let extractor = AmountExtractor::new();
        assert_eq!(
            extractor.extract("Total: $1,234.56").as_deref(),
            Some("1.234.56")
        );
        assert_eq!(extractor.extract("IVA 21% 21,00").as_deref(), Some("21"));
    }

    #[test]
    fn test_extract_no_amount() {
        assert!(AmountExtractor::new().extract("Subtotal:").is_none());
    }
}
