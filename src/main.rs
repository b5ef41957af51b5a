//! reviewcard - Render a business's latest reviews into an HTML page
//!
//! Loads the page, runs the review widget against its target element, and
//! writes the page back out. Retrieval problems never fail the run; the
//! fallback reviews are rendered instead.

use std::io::{self, Write};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reviewcard::cache::{FileStore, KeyValueStore, MemoryStore};
use reviewcard::cli::{log_level, CacheLocation, Cli, WidgetSettings};
use reviewcard::data::PlacesClient;
use reviewcard::render::HtmlPage;
use reviewcard::ReviewWidget;

/// Installs the stderr log subscriber, honouring `RUST_LOG` when set
fn init_tracing(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Picks the store backing the review cache
fn open_store(location: &CacheLocation) -> Box<dyn KeyValueStore> {
    match location {
        CacheLocation::Memory => Box::new(MemoryStore::new()),
        CacheLocation::Dir(dir) => Box::new(FileStore::with_dir(dir.clone())),
        CacheLocation::Default => match FileStore::new() {
            Some(store) => Box::new(store),
            None => {
                warn!("no user cache directory available; caching in memory");
                Box::new(MemoryStore::new())
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = WidgetSettings::from_cli(&cli)?;
    let page = HtmlPage::load(&settings.page)?;

    let widget = ReviewWidget::new(
        settings.config.clone(),
        open_store(&settings.cache),
        settings.policy.clone(),
        PlacesClient::with_proxy(settings.proxy_url.clone()),
        page,
    )
    .with_fetch_timeout(settings.fetch_timeout);

    let outcome = widget.init().await;
    info!(?outcome, target_id = %settings.config.target_container_id, "rendered reviews");

    let page = widget.into_document();
    if settings.writes_to_stdout() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(page.html().as_bytes())?;
        stdout.flush()?;
    } else {
        page.save(&settings.output)?;
    }

    Ok(())
}
