mod auth;
mod client;
mod comments;
pub mod images;
pub mod posts;
pub mod users;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{AuthResponse, BlogPost, Comment, ImageUpload, ProfileImageResponse};

pub use self::client::ApiClient;
pub use self::images::{resolve_image_url, DEFAULT_AVATAR};
pub use self::posts::MAX_POST_IMAGES;
pub use self::users::MAX_PROFILE_IMAGE_BYTES;

/// Blog API operations the views depend on.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn register(&self, username: &str, email: &str, password: &str)
        -> ApiResult<AuthResponse>;

    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse>;

    async fn list_posts(&self) -> ApiResult<Vec<BlogPost>>;

    async fn get_post(&self, id: i64) -> ApiResult<BlogPost>;

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        images: &[ImageUpload],
    ) -> ApiResult<BlogPost>;

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        images: Option<&[ImageUpload]>,
    ) -> ApiResult<BlogPost>;

    async fn delete_post(&self, id: i64) -> ApiResult<()>;

    async fn toggle_like(&self, id: i64) -> ApiResult<()>;

    async fn list_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>>;

    async fn add_comment(&self, post_id: i64, content: &str) -> ApiResult<Comment>;

    async fn delete_comment(&self, comment_id: i64) -> ApiResult<()>;

    async fn upload_profile_image(&self, image: &ImageUpload) -> ApiResult<ProfileImageResponse>;

    /// Resolve a server-relative image path for display.
    fn image_url(&self, path: Option<&str>) -> String;
}

#[async_trait]
impl BlogApi for ApiClient {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        ApiClient::register(self, username, email, password).await
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        ApiClient::login(self, email, password).await
    }

    async fn list_posts(&self) -> ApiResult<Vec<BlogPost>> {
        ApiClient::list_posts(self).await
    }

    async fn get_post(&self, id: i64) -> ApiResult<BlogPost> {
        ApiClient::get_post(self, id).await
    }

    async fn create_post(
        &self,
        title: &str,
        content: &str,
        images: &[ImageUpload],
    ) -> ApiResult<BlogPost> {
        ApiClient::create_post(self, title, content, images).await
    }

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        images: Option<&[ImageUpload]>,
    ) -> ApiResult<BlogPost> {
        ApiClient::update_post(self, id, title, content, images).await
    }

    async fn delete_post(&self, id: i64) -> ApiResult<()> {
        ApiClient::delete_post(self, id).await
    }

    async fn toggle_like(&self, id: i64) -> ApiResult<()> {
        ApiClient::toggle_like(self, id).await
    }

    async fn list_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        ApiClient::list_comments(self, post_id).await
    }

    async fn add_comment(&self, post_id: i64, content: &str) -> ApiResult<Comment> {
        ApiClient::add_comment(self, post_id, content).await
    }

    async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        ApiClient::delete_comment(self, comment_id).await
    }

    async fn upload_profile_image(&self, image: &ImageUpload) -> ApiResult<ProfileImageResponse> {
        ApiClient::upload_profile_image(self, image).await
    }

    fn image_url(&self, path: Option<&str>) -> String {
        self.resolve_image_url(path)
    }
}
