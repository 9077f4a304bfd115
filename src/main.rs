use anyhow::Context;
use clap::Parser;
use hwp_converter::app::ConverterApp;
use hwp_converter::config::ClientConfig;
use hwp_converter::convert::ConversionClient;
use hwp_converter::logging::init_logging;
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "hwp-converter", about = "Convert HWP/HWPX documents to PDF")]
struct Args {
    /// Base URL of the conversion server.
    #[arg(long, env = "HWP_CONVERTER_SERVER")]
    server: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = ClientConfig::load(args.config.as_deref())?.with_server_override(args.server)?;
    info!(server = %config.server_url, "configuration loaded");

    let client = ConversionClient::from_config(&config)?;
    let runtime = Runtime::new().context("failed to create tokio runtime")?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "HWP → PDF Converter",
        options,
        Box::new(move |cc| Box::new(ConverterApp::new(cc, config, client, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {}", e))?;

    Ok(())
}
