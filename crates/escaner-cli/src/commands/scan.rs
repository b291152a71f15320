//! Scan command - run OCR on a single image file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use escaner_core::invoice::InvoiceExtractor;
use escaner_core::{decode_image, LineItemExtractor, OcrSession, PureOcrEngine};

use super::{format_extraction, load_config, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image
    #[arg(required = true)]
    input: PathBuf,

    /// Extract invoice amounts instead of printing the raw text
    #[arg(short, long)]
    filter: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Only look for amounts on the keyword line itself
    #[arg(long)]
    no_lookahead: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if args.no_lookahead {
        config.extraction.lookahead = false;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );

    pb.set_message("Loading image...");
    let bytes = fs::read(&args.input)?;
    let image = decode_image(&bytes, config.ocr.max_image_size)?;

    pb.set_message("Loading OCR models...");
    let model_dir = args.model_dir.clone().unwrap_or_else(|| config.models.model_dir.clone());
    let models = config.models.clone();
    let ocr_config = config.ocr.clone();
    let mut session = OcrSession::new(move || {
        PureOcrEngine::from_dir(&model_dir, &models, ocr_config.clone())
    })
    .map_err(|e| {
        anyhow::anyhow!(
            "{e}\n\nPlace det.onnx, latin_rec.onnx and latin_dict.txt in the model directory \
             or pass --model-dir."
        )
    })?;

    pb.set_message("Running OCR...");
    let result = session
        .recognize(&image)
        .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

    pb.finish_and_clear();

    debug!(
        "OCR detected {} fragments in {}ms",
        result.fragments.len(),
        result.processing_time_ms
    );

    let output = if args.filter {
        let extractor = LineItemExtractor::from_config(&config.extraction);
        let table = extractor.extract(&result);
        format_extraction(table.as_ref(), args.format)?
    } else {
        match args.format {
            OutputFormat::Text => result.text_or_placeholder().to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        }
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
