//! Pages through a running storefront's listing from the terminal, the same
//! way the load-more button does in the browser.
//!
//! Usage: `browse [page-url]`, e.g. `browse "http://localhost:3000/?category=Music"`.

use std::env;
use storefront::client::{
    Cursor, HttpFragmentSource, LoadMoreController, LoadMoreView, PageFilters, Trigger,
};
use storefront::config;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Counts cards instead of drawing them.
#[derive(Default)]
struct TerminalView {
    cards: usize,
}

impl LoadMoreView for TerminalView {
    fn has_control(&self) -> bool {
        true
    }

    fn set_spinner(&mut self, visible: bool) {
        if visible {
            info!("loading...");
        }
    }

    fn set_enabled(&mut self, _enabled: bool) {}

    fn append(&mut self, markup: &str) {
        let added = markup.matches("class=\"product-card\"").count();
        self.cards += added;
        info!(added, total = self.cards, "appended products");
    }

    fn mark_exhausted(&mut self, label: &str) {
        info!("{label}");
    }

    fn alert(&mut self, message: &str) {
        warn!("{message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let page_url = env::args()
        .nth(1)
        .unwrap_or_else(|| format!("http://127.0.0.1:{}/", config::DEFAULT_PORT));
    let source = HttpFragmentSource::new(&page_url)?;
    let filters = PageFilters::from_page_url(&page_url);

    // The server renders the first ten products itself.
    let view = TerminalView::default();
    let mut controller = LoadMoreController::new(source, view, Cursor::Offset(10), filters)
        .with_min_display(config::min_spinner());

    loop {
        match controller.trigger().await {
            Trigger::Advanced => continue,
            Trigger::Exhausted | Trigger::Skipped => break,
            Trigger::Failed => return Err("listing could not be loaded".into()),
        }
    }

    let view = controller.into_view();
    info!(loaded = view.cards, "done");
    Ok(())
}
