use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::session::SessionStore;
use crate::routes::{Navigator, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Redirecting,
    Authorized,
}

/// What a guarded view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    Loading,
    Content(T),
}

/// Gates a protected view on the session predicate. Purely local, no network.
pub struct RouteGuard {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Read the session predicate and transition.
    pub fn check(&mut self) -> GuardState {
        let authenticated = self.session.is_authenticated();
        self.observe(authenticated)
    }

    /// Apply a new predicate value. Entering `Redirecting` navigates to login once.
    pub fn observe(&mut self, authenticated: bool) -> GuardState {
        if authenticated {
            self.state = GuardState::Authorized;
        } else if self.state != GuardState::Redirecting {
            tracing::debug!("Not signed in, redirecting to {}", Route::Login);
            self.state = GuardState::Redirecting;
            self.navigator.navigate(Route::Login);
        }
        self.state
    }

    /// Wait for the next session change and re-evaluate.
    /// Returns `None` once the session store is gone.
    pub async fn next_change(&mut self, changes: &mut watch::Receiver<bool>) -> Option<GuardState> {
        changes.changed().await.ok()?;
        let authenticated = *changes.borrow_and_update();
        Some(self.observe(authenticated))
    }

    /// `content` runs only when authorized.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Guarded<T> {
        match self.state {
            GuardState::Authorized => Guarded::Content(content()),
            GuardState::Checking | GuardState::Redirecting => Guarded::Loading,
        }
    }
}
