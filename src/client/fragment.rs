use once_cell::sync::Lazy;
use regex::Regex;

/// Id of the element the server appends to the final slice of a listing.
pub const NO_MORE_MARKER_ID: &str = "no-more-marker";

static MARKER_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<([a-z][a-z0-9]*)\b[^>]*\bid\s*=\s*["']no-more-marker["'][^>]*>"#,
    )
    .expect("marker pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(/?)([a-z][a-z0-9]*)\b[^>]*?(/?)>").expect("tag pattern is valid")
});

/// A load-more response split into the markup to append and whether the
/// listing is exhausted. The marker element, children included, never
/// survives into `markup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub markup: String,
    pub exhausted: bool,
}

impl Fragment {
    pub fn parse(html: &str) -> Self {
        let mut markup = html.to_string();
        let mut exhausted = false;

        while let Some(open) = MARKER_OPEN.captures(&markup) {
            let Some(whole) = open.get(0) else { break };
            let tag = open.get(1).map(|m| m.as_str()).unwrap_or_default();
            let start = whole.start();
            let end = if whole.as_str().ends_with("/>") {
                whole.end()
            } else {
                element_end(&markup, whole.end(), tag)
            };
            exhausted = true;
            markup.replace_range(start..end, "");
        }

        Self { markup, exhausted }
    }
}

/// Byte offset just past the close tag matching an element of `tag` whose
/// open tag ends at `from`. An unclosed element runs to the end of input,
/// as it would in the DOM.
fn element_end(html: &str, from: usize, tag: &str) -> usize {
    let mut depth = 1usize;
    for found in TAG.captures_iter(&html[from..]) {
        let name = found.get(2).map(|m| m.as_str()).unwrap_or_default();
        if !name.eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = found.get(1).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = found.get(3).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return from + found.get(0).map(|m| m.end()).unwrap_or_default();
            }
        } else if !self_closing {
            depth += 1;
        }
    }
    html.len()
}
