use std::fmt;

use crate::routes::{Notice, Route};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Link(&'static str, Route),
    /// The signed-in username, shown as plain text.
    User(String),
    /// Runs `logout` rather than navigating.
    Logout,
}

impl fmt::Display for NavItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavItem::Link(label, route) => write!(f, "{} ({})", label, route),
            NavItem::User(username) => write!(f, "{}", username),
            NavItem::Logout => write!(f, "Logout (bloghub logout)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navbar {
    pub items: Vec<NavItem>,
}

impl Navbar {
    pub fn username(&self) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            NavItem::User(username) => Some(username.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Navbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "BlogHub | {}", items.join(" | "))
    }
}

pub fn render(state: &AppState) -> Navbar {
    let mut items = vec![NavItem::Link("Home", Route::Home)];
    match state.username() {
        Some(username) => {
            items.push(NavItem::Link("Dashboard", Route::Dashboard));
            items.push(NavItem::User(username));
            items.push(NavItem::Logout);
        }
        None => {
            items.push(NavItem::Link("Login", Route::Login));
            items.push(NavItem::Link("Register", Route::Register));
        }
    }
    Navbar { items }
}

pub fn logout(state: &AppState) {
    if let Err(e) = state.session.logout() {
        tracing::warn!("Failed to clear session storage: {}", e);
    }
    state.notify(Notice::success("Logged out successfully"));
    state.navigate(Route::Home);
}
