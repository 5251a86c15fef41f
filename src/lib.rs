//! Remote-fragment loading element.
//!
//! SYSTEM CONTEXT
//! ==============
//! A host page instantiates elements through an [`ElementRegistry`], sets
//! their `data-url`, and forwards attach/detach/attribute signals. Each
//! element fetches its fragment through a [`FragmentSource`] and renders the
//! result, a loading placeholder, or an inline error into its own isolated
//! scope. `request` holds the state machine, `element` drives it, and
//! `source` talks HTTP.

pub mod config;
pub mod element;
pub mod error;
pub mod registry;
pub mod render;
pub mod request;
pub mod source;

pub use config::LoaderConfig;
pub use element::{ElementLifecycle, LoadHandle, LoadSnapshot, RemoteFragmentElement, SOURCE_ATTRIBUTE};
pub use error::{ErrorKind, LoadError, SetupError};
pub use registry::{ElementRegistry, RegistryError};
pub use render::{IsolatedScope, RenderRoot, View};
pub use request::{Completion, FragmentLoadRequest, LoadState, Ticket};
pub use source::{FragmentSource, HttpFragmentSource};
