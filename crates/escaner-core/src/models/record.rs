//! Extraction records and the `Nombre,Monto` output table.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Header row of the output table.
pub const TABLE_HEADER: &str = "Nombre,Monto";

/// Message returned to clients when filtering finds no records.
pub const NO_DATA_MESSAGE: &str = "No se encontraron datos de factura.";

/// A single "label, amount" pair found on an invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Matched keyword, capitalized (e.g. `Total`, `Iva`, `Total due`).
    pub label: String,

    /// Normalized amount string (`,` replaced by `.`, currency stripped).
    pub amount: String,
}

impl ExtractionRecord {
    pub fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
        }
    }

    /// Parse the amount as a decimal.
    ///
    /// Returns `None` when the normalized string has more than one `.`,
    /// which happens for grouped amounts such as `1,234.56` -> `1.234.56`.
    pub fn value(&self) -> Option<Decimal> {
        Decimal::from_str(&self.amount).ok()
    }
}

impl fmt::Display for ExtractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.label, self.amount)
    }
}

/// Non-empty, ordered collection of records rendered as a two-column table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    records: Vec<ExtractionRecord>,
}

impl RecordTable {
    /// Build a table, or `None` when there are no records.
    pub fn from_records(records: Vec<ExtractionRecord>) -> Option<Self> {
        if records.is_empty() {
            None
        } else {
            Some(Self { records })
        }
    }

    pub fn records(&self) -> &[ExtractionRecord] {
        &self.records
    }
}

impl fmt::Display for RecordTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(TABLE_HEADER)?;
        for record in &self.records {
            write!(f, "\n{}", record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_format() {
        let table = RecordTable::from_records(vec![
            ExtractionRecord::new("Base", "100.00"),
            ExtractionRecord::new("Iva", "21.00"),
        ])
        .unwrap();

        assert_eq!(table.to_string(), "Nombre,Monto\nBase,100.00\nIva,21.00");
    }

    #[test]
    fn test_empty_table_is_absent() {
        assert!(RecordTable::from_records(Vec::new()).is_none());
    }

    #[test]
    fn test_table_keeps_record_order() {
        let table = RecordTable::from_records(vec![
            ExtractionRecord::new("Total", "121.00"),
            ExtractionRecord::new("Base", "100.00"),
        ])
        .unwrap();

        let labels: Vec<_> = table.records().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Total", "Base"]);
    }

    #[test]
    fn test_record_value() {
        assert_eq!(
            ExtractionRecord::new("Total", "121.00").value(),
            Some(Decimal::new(12100, 2))
        );
        assert_eq!(ExtractionRecord::new("Total", "1.234.56").value(), None);
    }
}
