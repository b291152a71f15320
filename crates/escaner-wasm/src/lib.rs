//! WASM bindings for invoice line extraction.
//!
//! Lets the web frontend filter raw OCR text without another round trip to
//! the server.

use wasm_bindgen::prelude::*;

use escaner_core::invoice::{InvoiceExtractor as _, LineItemExtractor, ScanMode};
use escaner_core::models::record::{ExtractionRecord, NO_DATA_MESSAGE};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract the `Nombre,Monto` table from OCR text, or `undefined` if nothing matched.
#[wasm_bindgen]
pub fn extract_invoice_data(text: &str) -> Option<String> {
    escaner_core::extract_invoice_data(text)
}

/// Same as the server's filtered response: the table or the no-data message.
#[wasm_bindgen]
pub fn filter_text(text: &str) -> String {
    extract_invoice_data(text).unwrap_or_else(|| NO_DATA_MESSAGE.to_string())
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    extractor: LineItemExtractor,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create an extractor with the default keywords and lookahead.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: LineItemExtractor::new(),
        }
    }

    /// Replace the keyword list (order sets priority).
    #[wasm_bindgen]
    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.extractor = self.extractor.clone().with_keywords(keywords);
    }

    /// Enable or disable looking at the next line for a missing amount.
    #[wasm_bindgen]
    pub fn set_lookahead(&mut self, lookahead: bool) {
        let mode = if lookahead {
            ScanMode::Lookahead
        } else {
            ScanMode::SameLine
        };
        self.extractor = self.extractor.clone().with_mode(mode);
    }

    /// Extract the table, or `undefined` if nothing matched.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Option<String> {
        self.extractor
            .extract_from_text(text)
            .map(|table| table.to_string())
    }

    /// Extract records as an array of `{ label, amount }` objects.
    #[wasm_bindgen]
    pub fn records(&self, text: &str) -> Result<JsValue, JsValue> {
        let records: Vec<ExtractionRecord> = self.extractor.records(text);
        serde_wasm_bindgen::to_value(&records).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}
