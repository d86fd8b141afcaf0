use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::api::client::Payload;
use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{BlogPost, ImageUpload};

/// Most images a single post may carry.
pub const MAX_POST_IMAGES: usize = 10;

impl ApiClient {
    pub async fn list_posts(&self) -> ApiResult<Vec<BlogPost>> {
        self.send_json(Method::GET, "posts", Payload::Empty).await
    }

    pub async fn get_post(&self, id: i64) -> ApiResult<BlogPost> {
        self.send_json(Method::GET, &format!("posts/{}", id), Payload::Empty)
            .await
    }

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        images: &[ImageUpload],
    ) -> ApiResult<BlogPost> {
        let form = post_form(title, content, Some(images))?;
        self.send_json(Method::POST, "posts", Payload::Multipart(form))
            .await
    }

    /// `images: None` leaves the post's existing images alone.
    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        images: Option<&[ImageUpload]>,
    ) -> ApiResult<BlogPost> {
        let form = post_form(title, content, images)?;
        self.send_json(
            Method::PUT,
            &format!("posts/{}", id),
            Payload::Multipart(form),
        )
        .await
    }

    pub async fn delete_post(&self, id: i64) -> ApiResult<()> {
        self.send_empty(Method::DELETE, &format!("posts/{}", id), Payload::Empty)
            .await
    }

    /// Flip the caller's like on a post. Calling twice restores the original state.
    pub async fn toggle_like(&self, id: i64) -> ApiResult<()> {
        self.send_empty(Method::POST, &format!("posts/{}/like", id), Payload::Empty)
            .await
    }
}

fn post_form(title: &str, content: &str, images: Option<&[ImageUpload]>) -> ApiResult<Form> {
    let images = images.unwrap_or(&[]);
    if images.len() > MAX_POST_IMAGES {
        return Err(ApiError::Validation(format!(
            "A post can have at most {} images",
            MAX_POST_IMAGES
        )));
    }

    let mut form = Form::new()
        .text("title", title.to_string())
        .text("content", content.to_string());
    for image in images {
        form = form.part("images", image_part(image)?);
    }
    Ok(form)
}

pub(crate) fn image_part(image: &ImageUpload) -> ApiResult<Part> {
    let part = Part::bytes(image.bytes.to_vec())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)?;
    Ok(part)
}
