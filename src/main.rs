// steamgraft CLI: augment a listing page with storefront data.
//
// Reads the host page from a file or URL, runs the augmentation pipeline
// against the storefront, and writes the augmented HTML. Entries that could
// not be matched are left as-is; that is a success, not an error.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use steamgraft::{augment_html, AugmentConfig, StorefrontClient};

#[derive(Parser, Debug)]
#[command(name = "steamgraft", version, about = "Graft Steam store data onto repack listing pages")]
struct Args {
    /// Path to an HTML file, or an http(s) URL of the listing page.
    input: String,

    /// Write the augmented page here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Storefront base URL (mirror or test server).
    #[arg(long, default_value = "https://store.steampowered.com")]
    store_url: String,

    /// Print a per-entry JSON summary to stderr.
    #[arg(long)]
    report: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let html = read_input(&args.input).await?;

    let config = AugmentConfig::builder()
        .store_url(&args.store_url)
        .build()
        .context("Invalid configuration")?;
    let client = StorefrontClient::new(&config).context("Failed to set up storefront client")?;

    let outcome = augment_html(&html, &client, &config)
        .await
        .context("Augmentation failed")?;

    if args.report {
        serde_json::to_writer_pretty(std::io::stderr(), &outcome.entries)
            .context("Failed to write report")?;
        eprintln!();
    }

    match args.output {
        Some(path) => std::fs::write(&path, outcome.html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", outcome.html),
    }

    Ok(())
}

async fn read_input(input: &str) -> Result<String> {
    if input.starts_with("http://") || input.starts_with("https://") {
        let response = reqwest::get(input)
            .await
            .with_context(|| format!("Failed to fetch {input}"))?
            .error_for_status()
            .with_context(|| format!("{input} returned a non-success status"))?;
        response.text().await.context("Failed to read page body")
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}
