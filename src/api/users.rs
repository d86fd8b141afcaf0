use reqwest::multipart::Form;
use reqwest::Method;

use crate::api::client::Payload;
use crate::api::posts::image_part;
use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{ImageUpload, ProfileImageResponse};

/// 5 MiB.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn check_profile_image_size(image: &ImageUpload) -> ApiResult<()> {
    if image.size() > MAX_PROFILE_IMAGE_BYTES {
        return Err(ApiError::Validation("Image must be less than 5MB".into()));
    }
    Ok(())
}

impl ApiClient {
    /// Oversized files are rejected before any request is made.
    pub async fn upload_profile_image(
        &self,
        image: &ImageUpload,
    ) -> ApiResult<ProfileImageResponse> {
        check_profile_image_size(image)?;
        let form = Form::new().part("image", image_part(image)?);
        self.send_json(
            Method::POST,
            "users/profile-image",
            Payload::Multipart(form),
        )
        .await
    }
}
