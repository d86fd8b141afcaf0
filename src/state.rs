use std::sync::Arc;

use crate::api::BlogApi;
use crate::auth::SessionStore;
use crate::config::Config;
use crate::routes::{Navigator, Notice, Notifier, Route};

/// Everything a view needs, passed explicitly instead of living in globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub api: Arc<dyn BlogApi>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Username of the signed-in user, if any.
    pub fn username(&self) -> Option<String> {
        self.session.user().map(|u| u.username)
    }
}
