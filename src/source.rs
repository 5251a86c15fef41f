//! Where fragments come from.
//!
//! `FragmentSource` is the seam between the element and the network so the
//! element can be driven by a scripted source in tests. `HttpFragmentSource`
//! is the real thing: a same-origin GET marked as an asynchronous fetch and
//! carrying the session cookie.
//!
//! ERROR HANDLING
//! ==============
//! Every failure maps onto a `LoadError`. Cross-origin sources are refused
//! before any request is built. Cancellation is not handled here: the
//! element drops the `fetch` future, which aborts the in-flight request.

use std::borrow::Cow;

use hyper::ext::ReasonPhrase;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};

use crate::config::LoaderConfig;
use crate::error::{LoadError, SetupError};

/// Header marking the request as an asynchronous fetch.
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Async fragment fetcher. Implementations return the body of a successful
/// response, or the `LoadError` describing why there is none.
#[async_trait::async_trait]
pub trait FragmentSource: Send + Sync {
    /// Fetch the fragment at `source`, as written in the element attribute.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for configuration, status, or transport failures.
    async fn fetch(&self, source: &str) -> Result<String, LoadError>;
}

// =============================================================================
// HTTP SOURCE
// =============================================================================

pub struct HttpFragmentSource {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpFragmentSource {
    /// Build a source for `config.base_url`, sending `config.session_cookie`
    /// with every request.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the cookie is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &LoaderConfig) -> Result<Self, SetupError> {
        let headers = default_headers(config.session_cookie.as_deref())?;
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SetupError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `source` against the base URL.
    ///
    /// # Errors
    ///
    /// See [`resolve_source`].
    pub fn resolve(&self, source: &str) -> Result<Url, LoadError> {
        resolve_source(&self.base_url, source)
    }
}

#[async_trait::async_trait]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, source: &str) -> Result<String, LoadError> {
        let url = self.resolve(source)?;
        tracing::debug!(%url, "fetching fragment");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let sent = response.extensions().get::<ReasonPhrase>().map(ReasonPhrase::as_bytes);
            let text = status_text(sent, status);
            return Err(LoadError::http_status(status.as_u16(), text.as_deref()));
        }

        response
            .text()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))
    }
}

/// The status text a browser would expose: the reason phrase the server
/// sent, else the registered one for the code. hyper only keeps the sent
/// phrase when it differs from the registered one.
fn status_text(sent: Option<&[u8]>, status: StatusCode) -> Option<Cow<'_, str>> {
    match sent {
        Some(phrase) => Some(String::from_utf8_lossy(phrase)),
        None => status.canonical_reason().map(Cow::Borrowed),
    }
}

fn default_headers(session_cookie: Option<&str>) -> Result<HeaderMap, SetupError> {
    let mut headers = HeaderMap::new();
    headers.insert(REQUESTED_WITH_HEADER, HeaderValue::from_static(REQUESTED_WITH_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
    if let Some(cookie) = session_cookie {
        let mut value = HeaderValue::from_str(cookie)
            .map_err(|e| SetupError::ConfigParse(format!("session cookie: {e}")))?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}

/// Resolve an attribute value against `base`, refusing other origins.
///
/// # Errors
///
/// - [`LoadError::Transport`] when `source` cannot be parsed as a URL.
/// - [`LoadError::CrossOrigin`] when it resolves outside `base`'s origin.
pub fn resolve_source(base: &Url, source: &str) -> Result<Url, LoadError> {
    let url = base
        .join(source.trim())
        .map_err(|e| LoadError::Transport(format!("invalid URL '{source}': {e}")))?;
    if url.origin() != base.origin() {
        return Err(LoadError::CrossOrigin(url.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
