//! Loader configuration parsed from environment variables.

use reqwest::Url;

use crate::error::SetupError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8069";
pub const DEFAULT_TAG_NAME: &str = "remote-fragment";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Origin every source is resolved against and must stay within.
    pub base_url: Url,
    /// Raw `Cookie` header value carrying the session, e.g. `session_id=abc`.
    pub session_cookie: Option<String>,
    /// Custom-element tag the loader is registered under.
    pub tag_name: String,
}

impl LoaderConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `FRAGMENT_BASE_URL`: default `http://127.0.0.1:8069`
    /// - `FRAGMENT_SESSION_COOKIE`: sent as the `Cookie` header when set
    /// - `FRAGMENT_TAG_NAME`: default `remote-fragment`
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidBaseUrl`] if the base URL is not an
    /// absolute http(s) URL.
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`LoaderConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`LoaderConfig::from_env`].
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SetupError> {
        let base_url = parse_base_url(lookup("FRAGMENT_BASE_URL").as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let session_cookie = lookup("FRAGMENT_SESSION_COOKIE").filter(|v| !v.trim().is_empty());
        let tag_name = lookup("FRAGMENT_TAG_NAME").unwrap_or_else(|| DEFAULT_TAG_NAME.to_owned());

        Ok(Self { base_url, session_cookie, tag_name })
    }

    /// Replace the base URL, keeping other fields.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidBaseUrl`] for unusable URLs.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, SetupError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    #[must_use]
    pub fn with_tag_name(mut self, tag: impl Into<String>) -> Self {
        self.tag_name = tag.into();
        self
    }
}

/// Parse and validate a base URL: absolute, http or https, with a host.
///
/// # Errors
///
/// Returns [`SetupError::InvalidBaseUrl`] describing the offending value.
pub fn parse_base_url(raw: &str) -> Result<Url, SetupError> {
    let url = Url::parse(raw.trim()).map_err(|e| SetupError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SetupError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
