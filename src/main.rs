use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;

use palyno::{AssetStore, Classifier, DEFAULT_TOP_K};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to serve the demo page on
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Directory holding the model archive and class mapping
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,

    /// Number of ranked predictions per upload
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Pollen Grain Classifier Demo ===");

    // Asset bootstrap and model load happen once, before any request is
    // accepted. A failure here is fatal for the session.
    let assets = AssetStore::new(&args.assets_dir);
    let classifier = Classifier::builder()
        .with_assets(&assets)
        .context("failed to load the model or class mapping; check your asset files")?
        .with_top_k(args.top_k)?
        .build()?;

    let summary = classifier.info();
    info!(
        "Model ready: {} ({} classes, top-{})",
        summary.model_path, summary.num_classes, summary.top_k
    );

    let app = palyno::server::router(Arc::new(classifier));
    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!("Serving demo on http://{}", args.listen);

    axum::serve(listener, app).await?;
    Ok(())
}
