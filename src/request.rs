//! Per-element load state machine.
//!
//! DESIGN
//! ======
//! `FragmentLoadRequest` is the only mutable state an element owns. Each
//! load is identified by a [`Ticket`] (monotonic generation number) and
//! paired with a `CancellationToken`. Starting a load cancels the previous
//! token before issuing the new ticket, and a completion is applied only if
//! its ticket is still the active one and its token was never cancelled.
//! That makes ordering "last request wins" regardless of the order in which
//! responses arrive.
//!
//! The state transitions are synchronous and side-effect free so the async
//! driver in `element` only ever holds the lock for a transition.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;

// =============================================================================
// STATE
// =============================================================================

/// Lifecycle stage of the element's current load.
///
/// Content and error message live inside their variants, so they can never
/// be present at the same time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded { content: String },
    Errored { message: String },
}

impl LoadState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Errored { .. })
    }
}

/// Identity of one load attempt within one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the async driver needs to run one fetch.
#[derive(Debug, Clone)]
pub struct LoadPermit {
    pub ticket: Ticket,
    pub url: String,
    pub token: CancellationToken,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result became the element's state.
    Applied,
    /// The result was stale, cancelled, or arrived after detach.
    Discarded,
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Debug, Default)]
pub struct FragmentLoadRequest {
    source_url: Option<String>,
    state: LoadState,
    generation: u64,
    active: Option<(Ticket, CancellationToken)>,
}

impl FragmentLoadRequest {
    #[must_use]
    pub fn new(source_url: Option<String>) -> Self {
        Self { source_url: normalize(source_url), ..Self::default() }
    }

    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Store a new source. Does not start or cancel anything by itself.
    pub fn set_source_url(&mut self, url: Option<String>) {
        self.source_url = normalize(url);
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.state {
            LoadState::Loaded { content } => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Errored { message } => Some(message),
            _ => None,
        }
    }

    /// Ticket of the in-flight load, if any.
    #[must_use]
    pub fn active_ticket(&self) -> Option<Ticket> {
        self.active.as_ref().map(|(ticket, _)| *ticket)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.active
            .as_ref()
            .is_some_and(|(active, token)| *active == ticket && !token.is_cancelled())
    }

    /// Start a new load attempt.
    ///
    /// Any in-flight load is cancelled first. With no source configured the
    /// request moves straight to `Errored` and no permit is handed out.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingSource`] when no source URL is set.
    pub fn begin(&mut self) -> Result<LoadPermit, LoadError> {
        self.cancel();

        let Some(url) = self.source_url.clone() else {
            self.fail(&LoadError::MissingSource);
            return Err(LoadError::MissingSource);
        };

        self.generation += 1;
        let ticket = Ticket(self.generation);
        let token = CancellationToken::new();
        self.active = Some((ticket, token.clone()));
        self.state = LoadState::Loading;

        Ok(LoadPermit { ticket, url, token })
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Stale tickets and cancelled tokens leave the state untouched. A
    /// `LoadError::Cancelled` on a live ticket came from the source itself,
    /// not from us, and settles as a transport failure.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, LoadError>) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Discarded;
        }

        self.active = None;
        self.state = match result {
            Ok(content) => LoadState::Loaded { content },
            Err(err) => LoadState::Errored { message: source_failure(err).to_string() },
        };
        Completion::Applied
    }

    /// Terminal failure detected before any fetch was issued.
    pub fn fail(&mut self, err: &LoadError) {
        self.cancel();
        self.state = LoadState::Errored { message: err.to_string() };
    }

    /// Cancel the in-flight load, if any. Returns `true` if one was live.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// How a fetch failure on a live ticket is reported. Only the element's own
/// token may cancel a load.
pub(crate) fn source_failure(err: LoadError) -> LoadError {
    match err {
        LoadError::Cancelled => LoadError::Transport("request cancelled".into()),
        other => other,
    }
}

/// An empty or blank attribute value counts as absent.
fn normalize(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
