//! The remote-fragment element.
//!
//! DESIGN
//! ======
//! A host feeds the element three signals (attach, detach, attribute
//! changed) through [`ElementLifecycle`]. Each load runs as its own Tokio
//! task that races the fetch against the load's cancellation token. When
//! the fetch wins, the task re-locks the element and asks the
//! `FragmentLoadRequest` whether its ticket is still current before
//! rendering anything, so a response that beats its own cancellation is
//! still dropped.
//!
//! The lock is a plain `std::sync::Mutex`: it is only held for synchronous
//! state transitions and renders, never across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::LoadError;
use crate::render::{IsolatedScope, RenderRoot, View};
use crate::request::{Completion, FragmentLoadRequest, LoadPermit, LoadState, source_failure};
use crate::source::FragmentSource;

/// The only attribute whose changes trigger a reload.
pub const SOURCE_ATTRIBUTE: &str = "data-url";

/// Lifecycle hooks consumed from the host.
pub trait ElementLifecycle {
    /// The element was inserted into the page.
    fn on_attach(&self) -> Option<LoadHandle>;

    /// The source URL changed (or was removed).
    fn on_url_changed(&self, new_url: Option<String>) -> Option<LoadHandle>;

    /// The element was removed from the page.
    fn on_detach(&self);

    /// Generic attribute callback. Only [`SOURCE_ATTRIBUTE`] is observed.
    fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) -> Option<LoadHandle> {
        if name != SOURCE_ATTRIBUTE {
            return None;
        }
        tracing::trace!(?old, ?new, "source attribute changed");
        self.on_url_changed(new.map(str::to_owned))
    }
}

// =============================================================================
// LOAD HANDLE
// =============================================================================

/// Handle to one spawned load task.
#[derive(Debug)]
pub struct LoadHandle {
    ticket_generation: u64,
    task: JoinHandle<Completion>,
}

impl LoadHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.ticket_generation
    }

    /// Wait for the load task to finish and report whether it was applied.
    pub async fn finished(self) -> Completion {
        match self.task.await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(error = %e, "load task did not finish");
                Completion::Discarded
            }
        }
    }
}

/// Serializable view of an element, for hosts and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSnapshot {
    pub element: Uuid,
    pub source_url: Option<String>,
    pub attached: bool,
    #[serde(flatten)]
    pub state: LoadState,
}

// =============================================================================
// ELEMENT
// =============================================================================

struct ElementInner<R> {
    request: FragmentLoadRequest,
    root: R,
    attached: bool,
}

/// An element that fetches a fragment from its `data-url` and renders it
/// into its own isolated scope.
pub struct RemoteFragmentElement<R: RenderRoot = IsolatedScope> {
    id: Uuid,
    source: Arc<dyn FragmentSource>,
    inner: Arc<Mutex<ElementInner<R>>>,
}

impl RemoteFragmentElement<IsolatedScope> {
    #[must_use]
    pub fn new(source: Arc<dyn FragmentSource>) -> Self {
        Self::with_root(source, IsolatedScope::new())
    }
}

impl<R: RenderRoot> RemoteFragmentElement<R> {
    #[must_use]
    pub fn with_root(source: Arc<dyn FragmentSource>, root: R) -> Self {
        let inner = ElementInner { request: FragmentLoadRequest::default(), root, attached: false };
        Self { id: Uuid::new_v4(), source, inner: Arc::new(Mutex::new(inner)) }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Set the source without notifying the lifecycle. Used before attach.
    pub fn set_source_url(&self, url: Option<String>) {
        lock(&self.inner).request.set_source_url(url);
    }

    #[must_use]
    pub fn source_url(&self) -> Option<String> {
        lock(&self.inner).request.source_url().map(str::to_owned)
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        lock(&self.inner).attached
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        lock(&self.inner).request.state().clone()
    }

    /// Current markup of the element's isolated scope.
    #[must_use]
    pub fn inner_html(&self) -> String {
        lock(&self.inner).root.inner_html().to_owned()
    }

    /// Run `f` against the render root.
    pub fn with_root_ref<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&lock(&self.inner).root)
    }

    #[must_use]
    pub fn snapshot(&self) -> LoadSnapshot {
        let inner = lock(&self.inner);
        LoadSnapshot {
            element: self.id,
            source_url: inner.request.source_url().map(str::to_owned),
            attached: inner.attached,
            state: inner.request.state().clone(),
        }
    }

    /// Start a load for the current source.
    ///
    /// # Panics
    ///
    /// Spawns onto the ambient Tokio runtime; must be called from within one.
    fn start_load(&self) -> Option<LoadHandle> {
        let permit = {
            let mut inner = lock(&self.inner);
            match inner.request.begin() {
                Ok(permit) => {
                    inner.root.render(View::Loading);
                    permit
                }
                Err(err) => {
                    tracing::warn!(element = %self.id, code = err.error_code(), "{err}");
                    inner.root.render(View::Error(&err.to_string()));
                    return None;
                }
            }
        };

        let LoadPermit { ticket, url, token } = permit;
        tracing::debug!(element = %self.id, %ticket, %url, "fragment load started");

        let element = self.id;
        let source = Arc::clone(&self.source);
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = token.cancelled() => Err(LoadError::Cancelled),
                result = source.fetch(&url) => result,
            };

            let mut guard = lock(&inner);
            let state = &mut *guard;
            let failure = result.as_ref().err().cloned().map(source_failure);
            let completion = state.request.complete(ticket, result);
            match (completion, failure) {
                (Completion::Discarded, _) => {
                    tracing::debug!(%element, %ticket, %url, "fragment load discarded");
                }
                (Completion::Applied, None) => {
                    if let Some(content) = state.request.content() {
                        state.root.render(View::Fragment(content));
                    }
                    tracing::debug!(%element, %ticket, %url, "fragment loaded");
                }
                (Completion::Applied, Some(err)) => {
                    state.root.render(View::Error(&err.to_string()));
                    tracing::warn!(%element, %ticket, %url, code = err.error_code(), "{err}");
                }
            }
            completion
        });

        Some(LoadHandle { ticket_generation: ticket.generation(), task })
    }
}

impl<R: RenderRoot> ElementLifecycle for RemoteFragmentElement<R> {
    fn on_attach(&self) -> Option<LoadHandle> {
        lock(&self.inner).attached = true;
        self.start_load()
    }

    fn on_url_changed(&self, new_url: Option<String>) -> Option<LoadHandle> {
        let attached = {
            let mut inner = lock(&self.inner);
            inner.request.set_source_url(new_url);
            inner.attached
        };
        if attached { self.start_load() } else { None }
    }

    fn on_detach(&self) {
        let mut inner = lock(&self.inner);
        inner.attached = false;
        if inner.request.cancel() {
            tracing::debug!(element = %self.id, "detached with load in flight; cancelled");
        }
    }
}

impl<R: RenderRoot> Drop for RemoteFragmentElement<R> {
    fn drop(&mut self) {
        lock(&self.inner).request.cancel();
    }
}

fn lock<R>(inner: &Arc<Mutex<ElementInner<R>>>) -> MutexGuard<'_, ElementInner<R>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "element_test.rs"]
mod tests;
