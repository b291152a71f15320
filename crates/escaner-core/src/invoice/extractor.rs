//! Keyword-driven invoice line extractor.

use tracing::{debug, trace};

use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractionRecord, RecordTable};
use crate::ocr::OcrResult;

use super::cursor::{LineCursor, Transition};
use super::rules::{capitalize, AmountExtractor, KeywordMatcher};
use super::InvoiceExtractor;

/// Where an amount may be looked for once a keyword line is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Same line first, then the following line.
    #[default]
    Lookahead,
    /// Same line only.
    SameLine,
}

/// Extracts "label, amount" records from recognized invoice text.
///
/// Each line is trimmed, lower-cased and checked against the keyword list;
/// the first keyword contained in the line becomes the label. The first
/// amount on that line (or, in [`ScanMode::Lookahead`], on the next line)
/// becomes the value. A line yields at most one record.
#[derive(Debug, Clone)]
pub struct LineItemExtractor {
    keywords: KeywordMatcher,
    mode: ScanMode,
}

impl LineItemExtractor {
    /// Create an extractor with the default keywords and lookahead enabled.
    pub fn new() -> Self {
        Self {
            keywords: KeywordMatcher::new(),
            mode: ScanMode::Lookahead,
        }
    }

    /// Build an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let mode = if config.lookahead {
            ScanMode::Lookahead
        } else {
            ScanMode::SameLine
        };
        Self::new()
            .with_keywords(&config.keywords)
            .with_mode(mode)
    }

    /// Replace the keyword list. Order sets priority.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = KeywordMatcher::with_keywords(keywords);
        self
    }

    /// Set the scan mode.
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Scan text and collect records in line order.
    pub fn records(&self, text: &str) -> Vec<ExtractionRecord> {
        let amounts = AmountExtractor::new();
        let mut cursor = LineCursor::new(text);
        let mut records = Vec::new();

        while let Some(line) = cursor.current() {
            let (record, transition) = self.scan_line(&amounts, line, cursor.peek_next());

            if let Some(record) = record {
                debug!(
                    line = cursor.position(),
                    label = %record.label,
                    amount = %record.amount,
                    lookahead = transition == Transition::ConsumeLookahead,
                    "Extracted invoice record"
                );
                records.push(record);
            }

            cursor.advance(transition);
        }

        records
    }

    /// Handle one line and decide how the cursor moves next.
    fn scan_line(
        &self,
        amounts: &AmountExtractor,
        line: &str,
        next: Option<&str>,
    ) -> (Option<ExtractionRecord>, Transition) {
        let Some(keyword) = self.keywords.find(line) else {
            return (None, Transition::ScanCurrent);
        };

        if let Some(amount) = amounts.extract(line) {
            return (
                Some(ExtractionRecord::new(capitalize(keyword), amount)),
                Transition::ScanCurrent,
            );
        }

        if self.mode == ScanMode::Lookahead {
            if let Some(amount) = next.and_then(|n| amounts.extract(n)) {
                return (
                    Some(ExtractionRecord::new(capitalize(keyword), amount)),
                    Transition::ConsumeLookahead,
                );
            }
        }

        trace!(keyword, line, "Keyword line without amount");
        (None, Transition::ScanCurrent)
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for LineItemExtractor {
    fn extract(&self, ocr_result: &OcrResult) -> Option<RecordTable> {
        self.extract_from_text(&ocr_result.text)
    }

    fn extract_from_text(&self, text: &str) -> Option<RecordTable> {
        RecordTable::from_records(self.records(text))
    }
}
