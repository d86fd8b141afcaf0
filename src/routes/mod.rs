pub mod auth;
pub mod dashboard;
pub mod editor;
pub mod home;
pub mod navbar;
pub mod post;
pub mod profile;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use crate::auth::{Guarded, RouteGuard};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    CreatePost,
    EditPost(i64),
    Post(i64),
    Profile,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::Dashboard => write!(f, "/dashboard"),
            Route::CreatePost => write!(f, "/dashboard/create"),
            Route::EditPost(id) => write!(f, "/dashboard/edit/{}", id),
            Route::Post(id) => write!(f, "/blog/{}", id),
            Route::Profile => write!(f, "/profile"),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every navigation in order.
#[derive(Debug, Default)]
pub struct History {
    visited: Mutex<Vec<Route>>,
}

impl History {
    pub fn visited(&self) -> Vec<Route> {
        self.visited
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.visited().last().copied()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        self.visited
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(route);
    }
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    /// Prefer what the server (or client validation) said; `fallback` otherwise.
    pub fn from_error(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Transport(_)
            | ApiError::Json(_)
            | ApiError::Url(_)
            | ApiError::Storage(_) => Notice::Error(fallback.to_string()),
            other => Notice::Error(other.message()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(m) => write!(f, "✓ {}", m),
            Notice::Error(m) => write!(f, "✗ {}", m),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collects notices until the caller drains them.
#[derive(Debug, Default)]
pub struct Notices {
    pending: Mutex<Vec<Notice>>,
}

impl Notices {
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

impl Notifier for Notices {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Success(m) => tracing::debug!("Notice: {}", m),
            Notice::Error(m) => tracing::debug!("Error notice: {}", m),
        }
        self.pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(notice);
    }
}

/// Run a protected view. Signed-out sessions are sent to the login route and
/// the view never runs.
pub async fn protected<T, F, Fut>(state: &AppState, view: F) -> Guarded<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let mut guard = RouteGuard::new(state.session.clone(), state.navigator.clone());
    guard.check();
    match guard.render(view) {
        Guarded::Content(pending) => Guarded::Content(pending.await),
        Guarded::Loading => Guarded::Loading,
    }
}
