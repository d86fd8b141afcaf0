use crate::api::MAX_POST_IMAGES;
use crate::auth::Guarded;
use crate::models::{BlogPost, ImageUpload};
use crate::routes::{protected, Notice, Route};
use crate::state::AppState;

pub const MAX_TITLE_CHARS: usize = 200;

/// Fields of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub images: Vec<ImageUpload>,
}

impl PostForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<ImageUpload>) -> Self {
        self.images = images;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".into());
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!(
                "Title must be {} characters or less",
                MAX_TITLE_CHARS
            ));
        }
        if self.content.trim().is_empty() {
            return Err("Content is required".into());
        }
        if self.images.len() > MAX_POST_IMAGES {
            return Err(format!(
                "A post can have at most {} images",
                MAX_POST_IMAGES
            ));
        }
        Ok(())
    }
}

pub async fn create(state: &AppState, form: PostForm) -> Guarded<Option<BlogPost>> {
    protected(state, || async move {
        if let Err(message) = form.validate() {
            state.notify(Notice::error(message));
            return None;
        }

        match state
            .api
            .create_post(&form.title, &form.content, &form.images)
            .await
        {
            Ok(post) => {
                tracing::info!("Created post {}", post.id);
                state.notify(Notice::success("Post created successfully!"));
                state.navigate(Route::Dashboard);
                Some(post)
            }
            Err(e) => {
                state.notify(Notice::from_error(&e, "Failed to create post"));
                None
            }
        }
    })
    .await
}

/// Prefill the edit form from the existing post.
pub async fn load(state: &AppState, id: i64) -> Guarded<Option<PostForm>> {
    protected(state, || async move {
        match state.api.get_post(id).await {
            Ok(post) => Some(PostForm::new(post.title, post.content)),
            Err(e) => {
                tracing::warn!("Failed to fetch post {}: {}", id, e);
                state.notify(Notice::error("Failed to fetch post"));
                state.navigate(Route::Dashboard);
                None
            }
        }
    })
    .await
}

/// An empty image list keeps the post's current images.
pub async fn update(state: &AppState, id: i64, form: PostForm) -> Guarded<Option<BlogPost>> {
    protected(state, || async move {
        if let Err(message) = form.validate() {
            state.notify(Notice::error(message));
            return None;
        }

        let images = (!form.images.is_empty()).then_some(form.images.as_slice());
        match state
            .api
            .update_post(id, &form.title, &form.content, images)
            .await
        {
            Ok(post) => {
                state.notify(Notice::success("Post updated successfully!"));
                state.navigate(Route::Dashboard);
                Some(post)
            }
            Err(e) => {
                state.notify(Notice::from_error(&e, "Failed to update post"));
                None
            }
        }
    })
    .await
}
