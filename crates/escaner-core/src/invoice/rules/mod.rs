//! Rule-based matchers for invoice lines.

pub mod amounts;
pub mod keywords;
pub mod patterns;

pub use amounts::{normalize_amount, AmountExtractor};
pub use keywords::{capitalize, KeywordMatcher, DEFAULT_KEYWORDS};
pub use patterns::*;
