//! Extract command - pull invoice amounts out of already recognized text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use escaner_core::invoice::InvoiceExtractor;
use escaner_core::LineItemExtractor;

use super::{format_extraction, load_config, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file to read (default: stdin, also with "-")
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Only look for amounts on the keyword line itself
    #[arg(long)]
    no_lookahead: bool,

    /// Comma-separated keywords, in priority order (overrides config)
    #[arg(short, long, value_delimiter = ',')]
    keywords: Vec<String>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.no_lookahead {
        config.extraction.lookahead = false;
    }
    if !args.keywords.is_empty() {
        config.extraction.keywords = args.keywords;
    }

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    debug!("Extracting from {} lines", text.lines().count());

    let extractor = LineItemExtractor::from_config(&config.extraction);
    let table = extractor.extract_from_text(&text);

    println!("{}", format_extraction(table.as_ref(), args.format)?);

    Ok(())
}
