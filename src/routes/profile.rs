use std::fmt;

use crate::api::users::check_profile_image_size;
use crate::auth::Guarded;
use crate::models::ImageUpload;
use crate::routes::{protected, Notice};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub avatar_url: String,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Username: {}", self.username)?;
        writeln!(f, "Email:    {}", self.email)?;
        write!(f, "Avatar:   {}", self.avatar_url)
    }
}

pub async fn show(state: &AppState) -> Guarded<Option<Profile>> {
    protected(state, || async { current_profile(state) }).await
}

/// Upload a new profile picture and store its path in the session.
pub async fn upload_avatar(state: &AppState, image: ImageUpload) -> Guarded<Option<Profile>> {
    protected(state, || async move {
        if let Err(e) = check_profile_image_size(&image) {
            state.notify(Notice::error(e.message()));
            return None;
        }

        let uploaded = match state.api.upload_profile_image(&image).await {
            Ok(uploaded) => uploaded,
            Err(e) => {
                tracing::warn!("Failed to upload profile image: {}", e);
                state.notify(Notice::error("Failed to upload image"));
                return None;
            }
        };

        if let Err(e) = state.session.update_profile_image(uploaded.profile_image) {
            tracing::warn!("Failed to store profile image in session: {}", e);
        }
        state.notify(Notice::success("Profile image updated!"));
        current_profile(state)
    })
    .await
}

fn current_profile(state: &AppState) -> Option<Profile> {
    let user = state.session.user()?;
    Some(Profile {
        avatar_url: state.api.image_url(user.profile_image.as_deref()),
        username: user.username,
        email: user.email,
    })
}
