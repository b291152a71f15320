//! Serve command - run the OCR HTTP service.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::info;

use escaner_core::{LineItemExtractor, PureOcrEngine};

use super::load_config;
use crate::server::{self, AppState, OcrWorker};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Directory with a web frontend to serve at `/`
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Only look for amounts on the keyword line itself
    #[arg(long)]
    no_lookahead: bool,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port
            .parse()
            .with_context(|| format!("Invalid PORT value: {port}"))?;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = Some(dir);
    }
    if args.no_lookahead {
        config.extraction.lookahead = false;
    }

    let model_dir = args.model_dir.unwrap_or_else(|| config.models.model_dir.clone());
    let models = config.models.clone();
    let ocr_config = config.ocr.clone();

    info!("Loading OCR models from {}", model_dir.display());
    let worker = OcrWorker::spawn(move || {
        PureOcrEngine::from_dir(&model_dir, &models, ocr_config.clone())
    })
    .await
    .context("Failed to load OCR models")?;

    let extractor = LineItemExtractor::from_config(&config.extraction);
    let state = AppState::new(worker, extractor, config.ocr.max_image_size);
    let app = server::build_router(state, &config.server);

    let host: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid host address: {}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    println!(
        "{} OCR service listening on http://{}",
        style("✓").green(),
        addr
    );

    server::run(addr, app).await
}
