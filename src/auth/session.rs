use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::auth::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use crate::error::ApiResult;
use crate::models::{AuthResponse, User};

/// The signed-in identity. `user` and `token` are always both set or both empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Write-through session state shared by everything that talks to the API.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<Session>,
    changes: watch::Sender<bool>,
}

impl SessionStore {
    /// Restore the session from durable storage.
    ///
    /// Both keys must be present and the user record must parse; anything
    /// else starts signed out.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let session = match (storage.get(TOKEN_KEY), storage.get(USER_KEY)) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    tracing::debug!("Restored session for {}", user.username);
                    Session {
                        user: Some(user),
                        token: Some(token),
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse stored user, starting signed out: {}", e);
                    Session::default()
                }
            },
            _ => Session::default(),
        };

        let (changes, _) = watch::channel(session.token.is_some());
        Self {
            storage,
            state: RwLock::new(session),
            changes,
        }
    }

    /// Store the user and bearer token, durable storage first.
    pub fn set_auth(&self, user: User, token: impl Into<String>) -> ApiResult<()> {
        let token = token.into();
        let user_json = serde_json::to_string(&user)?;

        self.storage
            .set_many(&[(TOKEN_KEY, token.as_str()), (USER_KEY, user_json.as_str())])?;

        {
            let mut state = self.write();
            state.user = Some(user);
            state.token = Some(token);
        }
        self.changes.send_replace(true);
        Ok(())
    }

    /// Store the identity a login or registration returned.
    pub fn sign_in(&self, response: AuthResponse) -> ApiResult<User> {
        let (user, token) = response.into_session_parts();
        self.set_auth(user.clone(), token)?;
        tracing::info!("Signed in as {}", user.username);
        Ok(user)
    }

    /// Forget the session. Safe to call when already signed out.
    ///
    /// Memory is cleared even if storage fails; the storage error is returned.
    pub fn logout(&self) -> ApiResult<()> {
        let removed = self.storage.remove_many(&[TOKEN_KEY, USER_KEY]);

        *self.write() = Session::default();
        self.changes.send_replace(false);

        removed?;
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// Replace the stored user's profile image. Returns false when signed out.
    pub fn update_profile_image(&self, profile_image: impl Into<String>) -> ApiResult<bool> {
        let Session {
            user: Some(mut user),
            token: Some(token),
        } = self.snapshot()
        else {
            return Ok(false);
        };

        user.profile_image = Some(profile_image.into());
        self.set_auth(user, token)?;
        Ok(true)
    }

    /// Receive the authentication predicate every time the session changes.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.changes.subscribe()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
