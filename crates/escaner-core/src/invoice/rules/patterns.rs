//! Regex patterns for invoice line extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 1-3 digits, optional groups of 3 after `.`/`,`, optional 2-digit fraction
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"([0-9]{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)"
    ).unwrap();

    // Currency symbol with an optional leading whitespace character
    pub static ref CURRENCY_SYMBOLS: Regex = Regex::new(
        r"(?i)(\s)?(US\$|\$|€|¥|₡|₱|₹)"
    ).unwrap();

    // Line boundaries: CRLF, LF, CR, VT, FF, FS, GS, RS, NEL, LS, PS
    pub static ref LINE_BREAK: Regex = Regex::new(
        r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]"
    ).unwrap();
}
