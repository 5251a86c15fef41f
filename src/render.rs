//! Views rendered into an element's isolated scope.
//!
//! DESIGN
//! ======
//! The element never touches host state: every render replaces the whole
//! content of its own `RenderRoot`. The loading and error views carry their
//! own `<style>` block scoped to the root (`:host`), and error messages are
//! inserted as text. Fetched fragments are trusted verbatim; the endpoint is
//! responsible for what it serves.

const LOADING_VIEW: &str = "<style>
  :host { display:block; }
  .loading { font: 14px/1.4 system-ui, -apple-system, Segoe UI, Roboto; opacity:.7; }
</style>
<p class=\"loading\">Loading\u{2026}</p>";

const ERROR_STYLE: &str = "<style>
  :host { display:block; }
  .err { color:#b71c1c; font: 14px/1.4 system-ui, -apple-system; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
</style>";

/// One of the three things an element can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Fragment(&'a str),
    Error(&'a str),
}

impl View<'_> {
    /// Markup for this view.
    #[must_use]
    pub fn markup(self) -> String {
        match self {
            Self::Loading => LOADING_VIEW.to_owned(),
            Self::Fragment(html) => html.to_owned(),
            Self::Error(message) => {
                let mut out = String::with_capacity(ERROR_STYLE.len() + message.len() + 48);
                out.push_str(ERROR_STYLE);
                out.push_str("\n<p class=\"err\">Error: <code>");
                out.push_str(&escape_text(message));
                out.push_str("</code></p>");
                out
            }
        }
    }
}

/// Escape `text` for insertion as an HTML text node.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// RENDER ROOT
// =============================================================================

/// A rendering boundary owned by exactly one element.
pub trait RenderRoot: Send + 'static {
    /// Replace everything inside the root with `markup`.
    fn replace(&mut self, markup: String);

    /// Current content of the root.
    fn inner_html(&self) -> &str;

    fn render(&mut self, view: View<'_>) {
        self.replace(view.markup());
    }
}

/// In-memory isolated scope. Holds the markup a shadow root would hold.
#[derive(Debug, Default, Clone)]
pub struct IsolatedScope {
    markup: String,
    renders: u64,
}

impl IsolatedScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renders so far, including loading placeholders.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders
    }
}

impl RenderRoot for IsolatedScope {
    fn replace(&mut self, markup: String) {
        self.markup = markup;
        self.renders += 1;
    }

    fn inner_html(&self) -> &str {
        &self.markup
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
