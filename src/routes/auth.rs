use crate::models::{AuthResponse, User};
use crate::routes::{Notice, Route};
use crate::state::AppState;

pub async fn login(state: &AppState, email: &str, password: &str) -> Option<User> {
    match state.api.login(email, password).await {
        Ok(response) => sign_in(state, response, "Logged in successfully"),
        Err(e) => {
            state.notify(Notice::from_error(&e, "Login failed"));
            None
        }
    }
}

pub async fn register(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> Option<User> {
    match state.api.register(username, email, password).await {
        Ok(response) => sign_in(state, response, "Account created successfully"),
        Err(e) => {
            state.notify(Notice::from_error(&e, "Registration failed"));
            None
        }
    }
}

fn sign_in(state: &AppState, response: AuthResponse, message: &str) -> Option<User> {
    let user = match state.session.sign_in(response) {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to store session: {}", e);
            state.notify(Notice::error("Could not save your session"));
            return None;
        }
    };
    state.notify(Notice::success(message));
    state.navigate(Route::Dashboard);
    Some(user)
}
