//! Invoice line extraction module.

mod cursor;
mod extractor;
pub mod rules;

pub use cursor::{LineCursor, Transition};
pub use extractor::{LineItemExtractor, ScanMode};
pub use rules::DEFAULT_KEYWORDS;

use crate::models::record::RecordTable;
use crate::ocr::OcrResult;

/// Trait for invoice extractors.
///
/// Extraction never fails: an input without matches yields `None`.
pub trait InvoiceExtractor {
    /// Extract records from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> Option<RecordTable>;

    /// Extract records from plain text.
    fn extract_from_text(&self, text: &str) -> Option<RecordTable>;
}

/// Run the default extractor and render the `Nombre,Monto` table.
pub fn extract_invoice_data(text: &str) -> Option<String> {
    LineItemExtractor::new()
        .extract_from_text(text)
        .map(|table| table.to_string())
}
