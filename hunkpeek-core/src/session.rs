//! Single-active-session bookkeeping.
//!
//! A session exists from the moment a renderer shows a hunk until it is closed
//! by an explicit hide, by navigation, or by the renderer's own dismissal. At
//! most one session is open at any instant.
//!
//! `SessionState` is a cheap cloneable handle around a mutex. Renderers keep a
//! clone to request dismissal from their own UI. The lock is never held while
//! restore or teardown callbacks run, so a teardown that calls back into
//! [`SessionState::close`] sees an already-closed session and does nothing.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::types::Origin;

/// One-shot dismissal callback handed out by a renderer.
pub type Teardown = Box<dyn FnOnce() + Send>;

struct Session {
    origin: Origin,
    teardown: Teardown,
}

/// Handle to the process-wide hunk session slot.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<Mutex<Option<Session>>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("origin", &self.origin())
            .finish()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Session>> {
        // A poisoned slot only means a callback panicked elsewhere; the
        // Option inside is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a session for `origin` owning `teardown`.
    ///
    /// Rejected when a session is already open: the existing session is kept,
    /// `teardown` is dropped without being called, and `false` is returned.
    pub fn open(&self, origin: Origin, teardown: Teardown) -> bool {
        self.try_open(origin, teardown).is_ok()
    }

    /// Like [`SessionState::open`], but hands a rejected `teardown` back to the
    /// caller so it can dismiss whatever the renderer already put up.
    pub fn try_open(&self, origin: Origin, teardown: Teardown) -> Result<(), Teardown> {
        let mut slot = self.slot();
        if slot.is_some() {
            warn!(view = %origin.view, "session already open, close it first");
            return Err(teardown);
        }
        debug!(view = %origin.view, line = origin.position.line, "session opened");
        *slot = Some(Session { origin, teardown });
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.slot().is_some()
    }

    /// Origin of the open session, if any.
    pub fn origin(&self) -> Option<Origin> {
        self.slot().as_ref().map(|s| s.origin.clone())
    }

    /// Closes the open session, if any.
    ///
    /// Hands the origin to `restore` first, then runs the teardown exactly
    /// once. Returns `true` when a session was actually closed; closing an
    /// already-closed session is a no-op returning `false`.
    pub fn close<F>(&self, restore: F) -> bool
    where
        F: FnOnce(&Origin),
    {
        let Some(session) = self.slot().take() else {
            return false;
        };
        debug!(view = %session.origin.view, "session closed");
        restore(&session.origin);
        (session.teardown)();
        true
    }
}
