pub mod config;
pub mod extract;
pub mod scan;
pub mod serve;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use escaner_core::models::config::EscanerConfig;
use escaner_core::models::record::{ExtractionRecord, NO_DATA_MESSAGE};
use escaner_core::RecordTable;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("escaner")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<EscanerConfig> {
    if let Some(path) = config_path {
        return Ok(EscanerConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(EscanerConfig::from_file(&default_path)?)
    } else {
        Ok(EscanerConfig::default())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (table or message)
    Text,
    /// JSON with structured records
    Json,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    label: &'a str,
    amount: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    text: String,
    records: Vec<JsonRecord<'a>>,
}

/// Render an extraction outcome in the requested format.
pub fn format_extraction(table: Option<&RecordTable>, format: OutputFormat) -> anyhow::Result<String> {
    let text = table
        .map(|t| t.to_string())
        .unwrap_or_else(|| NO_DATA_MESSAGE.to_string());

    match format {
        OutputFormat::Text => Ok(text),
        OutputFormat::Json => {
            let records = table
                .map(|t| t.records().iter().map(json_record).collect())
                .unwrap_or_default();
            Ok(serde_json::to_string_pretty(&JsonOutput { text, records })?)
        }
    }
}

fn json_record(record: &ExtractionRecord) -> JsonRecord<'_> {
    JsonRecord {
        label: &record.label,
        amount: &record.amount,
        value: record.value().map(|d| d.to_string()),
    }
}
