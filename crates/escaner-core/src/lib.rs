//! Core library for receipt and invoice scanning.
//!
//! This crate provides:
//! - An OCR provider abstraction with a `pure-onnx-ocr` backed engine
//! - An owned OCR session that rebuilds its engine once on failure
//! - Invoice line extraction ("label, amount" pairs) from recognized text

pub mod error;
pub mod models;
pub mod ocr;
pub mod invoice;

pub use error::{EscanerError, OcrError, Result};
pub use models::record::{ExtractionRecord, RecordTable};
pub use ocr::{decode_image, OcrProvider, OcrResult, OcrSession, TextFragment};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use invoice::{extract_invoice_data, LineItemExtractor, ScanMode};
