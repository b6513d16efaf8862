use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use maps_listing_scraper::{
    SearchSession, SessionConfig, StaticDom, build_search_url, output_file_path, write_listings,
};

/// Scrape business listings from a saved infinite-scroll search results
/// page into a CSV file.
#[derive(Debug, Parser)]
#[command(name = "maps-listing-scraper", version, about)]
struct Args {
    /// Search term the results page was produced for (must match the
    /// page's echoed results label)
    #[arg(long)]
    search: String,

    /// Saved results page HTML, served through the offline backend
    #[arg(long)]
    input: PathBuf,

    /// Scroll-iteration budget for progressive loading
    #[arg(long, default_value_t = 20)]
    scrolls: usize,

    /// Run the browser layer headless; ignored for saved pages
    #[arg(long)]
    headless: bool,

    /// Directory the CSV file is written into
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    if args.headless {
        log::info!("--headless has no effect on a saved page");
    }

    let html = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let backend = StaticDom::new().with_page(build_search_url(&args.search), html);

    let mut config = SessionConfig::for_term(&args.search);
    config.pagination.budget = args.scrolls;

    let output = SearchSession::new(backend, config).run().await;
    if output.listings.is_empty() {
        log::info!("No companies found");
        return Ok(());
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
    let path = output_file_path(&args.out_dir, &args.search);
    write_listings(&path, &output.listings)?;
    log::info!("Wrote {} listings to {}", output.listings.len(), path.display());
    Ok(())
}
