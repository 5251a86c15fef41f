//! Element definitions keyed by custom-element tag name.
//!
//! DESIGN
//! ======
//! The registry is an owned value created once at startup and handed to
//! whatever needs to create elements; there is no process-wide instance.
//! Defining a tag twice keeps the first definition, so repeated setup
//! (reloads, tests) is harmless.

use std::collections::HashMap;
use std::sync::Arc;

use crate::element::{RemoteFragmentElement, SOURCE_ATTRIBUTE};
use crate::source::FragmentSource;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid custom element name: {0:?}")]
    InvalidTagName(String),
    #[error("no element defined for tag {0:?}")]
    UnknownTag(String),
}

#[derive(Default)]
pub struct ElementRegistry {
    definitions: HashMap<String, Arc<dyn FragmentSource>>,
}

impl ElementRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `tag` as a remote-fragment element fetching through `source`.
    ///
    /// Returns `Ok(false)` if the tag was already defined; the existing
    /// definition is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidTagName`] for names that are not
    /// valid custom-element names.
    pub fn define(&mut self, tag: &str, source: Arc<dyn FragmentSource>) -> Result<bool, RegistryError> {
        if !is_valid_tag_name(tag) {
            return Err(RegistryError::InvalidTagName(tag.to_owned()));
        }
        if self.definitions.contains_key(tag) {
            tracing::debug!(tag, "element already defined; keeping existing definition");
            return Ok(false);
        }
        self.definitions.insert(tag.to_owned(), source);
        tracing::debug!(tag, "element defined");
        Ok(true)
    }

    #[must_use]
    pub fn is_defined(&self, tag: &str) -> bool {
        self.definitions.contains_key(tag)
    }

    /// Create a fresh, detached element for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownTag`] if `tag` was never defined.
    pub fn create(&self, tag: &str) -> Result<RemoteFragmentElement, RegistryError> {
        let source = self
            .definitions
            .get(tag)
            .ok_or_else(|| RegistryError::UnknownTag(tag.to_owned()))?;
        Ok(RemoteFragmentElement::new(Arc::clone(source)))
    }

    /// Attributes whose changes the defined elements react to.
    #[must_use]
    pub fn observed_attributes() -> &'static [&'static str] {
        &[SOURCE_ATTRIBUTE]
    }
}

/// Custom-element naming rule: starts with a lowercase ASCII letter,
/// contains a hyphen, and has no uppercase letters or whitespace.
#[must_use]
pub fn is_valid_tag_name(tag: &str) -> bool {
    let Some(first) = tag.chars().next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && tag.contains('-')
        && tag
            .chars()
            .all(|c| !c.is_ascii_uppercase() && !c.is_whitespace() && c != '/' && c != '>')
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
