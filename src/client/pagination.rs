use super::fetch::FragmentSource;
use super::fragment::Fragment;
use crate::config::DEFAULT_MIN_SPINNER;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, error, info};

pub const LOAD_MORE_PATH: &str = "/load-more-products";
pub const OFFSET_STRIDE: u32 = 10;
pub const EXHAUSTED_LABEL: &str = "No more treasures found";
pub const FAILURE_ALERT: &str = "Could not load more products.";

/// Position in the listing. Page cursors are 1-based and advance by one,
/// offset cursors advance by [`OFFSET_STRIDE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Page(u32),
    Offset(u32),
}

impl Cursor {
    pub fn advanced(self) -> Self {
        match self {
            Cursor::Page(page) => Cursor::Page(page.saturating_add(1)),
            Cursor::Offset(offset) => Cursor::Offset(offset.saturating_add(OFFSET_STRIDE)),
        }
    }
}

/// Search filters carried over from the page's own URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFilters {
    pub query: String,
    pub category: String,
}

impl PageFilters {
    /// Reads `query` and `category` from the query string of `url`, first
    /// occurrence winning as `URLSearchParams.get` does. Missing parameters,
    /// or a URL that does not parse, give empty filters.
    pub fn from_page_url(url: &str) -> Self {
        let mut filters = Self::default();
        let Ok(url) = Url::parse(url) else {
            return filters;
        };

        let (mut query, mut category) = (None, None);
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "query" if query.is_none() => query = Some(value.into_owned()),
                "category" if category.is_none() => category = Some(value.into_owned()),
                _ => {}
            }
        }
        filters.query = query.unwrap_or_default();
        filters.category = category.unwrap_or_default();
        filters
    }
}

pub fn request_path(cursor: Cursor, filters: &PageFilters) -> String {
    match cursor {
        Cursor::Page(page) => format!("{LOAD_MORE_PATH}?page={page}"),
        Cursor::Offset(offset) => format!(
            "{LOAD_MORE_PATH}?offset={offset}&query={}&category={}",
            urlencoding::encode(&filters.query),
            urlencoding::encode(&filters.category),
        ),
    }
}

/// The page elements the controller drives: the load-more control, the
/// spinner and the results container.
pub trait LoadMoreView {
    /// Whether the load-more control exists on this page.
    fn has_control(&self) -> bool;
    fn set_spinner(&mut self, visible: bool);
    fn set_enabled(&mut self, enabled: bool);
    /// Appends markup to the end of the results container.
    fn append(&mut self, markup: &str);
    /// Disables the control for good, relabels it and swaps its style.
    fn mark_exhausted(&mut self, label: &str);
    fn alert(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    Loading,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// No control on the page, or the control is busy or exhausted.
    Skipped,
    Advanced,
    Exhausted,
    Failed,
}

pub struct LoadMoreController<S, V> {
    source: S,
    view: V,
    cursor: Cursor,
    filters: PageFilters,
    state: ControlState,
    min_display: Duration,
}

impl<S: FragmentSource, V: LoadMoreView> LoadMoreController<S, V> {
    pub fn new(source: S, view: V, cursor: Cursor, filters: PageFilters) -> Self {
        Self {
            source,
            view,
            cursor,
            filters,
            state: ControlState::Idle,
            min_display: DEFAULT_MIN_SPINNER,
        }
    }

    pub fn with_min_display(mut self, min_display: Duration) -> Self {
        self.min_display = min_display;
        self
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Handles one click on the load-more control.
    pub async fn trigger(&mut self) -> Trigger {
        if !self.view.has_control() || self.state != ControlState::Idle {
            return Trigger::Skipped;
        }

        self.state = ControlState::Loading;
        self.view.set_spinner(true);
        self.view.set_enabled(false);

        let path = request_path(self.cursor, &self.filters);
        debug!(%path, "requesting next fragment");
        let (result, ()) = tokio::join!(
            self.source.fetch(&path),
            tokio::time::sleep(self.min_display)
        );

        let outcome = match result {
            Ok(html) => {
                let fragment = Fragment::parse(&html);
                self.view.append(&fragment.markup);
                if fragment.exhausted {
                    info!(cursor = ?self.cursor, "listing exhausted");
                    self.state = ControlState::Exhausted;
                    self.view.mark_exhausted(EXHAUSTED_LABEL);
                    Trigger::Exhausted
                } else {
                    self.cursor = self.cursor.advanced();
                    self.state = ControlState::Idle;
                    self.view.set_enabled(true);
                    Trigger::Advanced
                }
            }
            Err(err) => {
                error!(%path, "failed to load more products: {err}");
                self.view.alert(FAILURE_ALERT);
                self.state = ControlState::Idle;
                self.view.set_enabled(true);
                Trigger::Failed
            }
        };

        self.view.set_spinner(false);
        outcome
    }
}
