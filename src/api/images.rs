use crate::api::ApiClient;

/// Shown when a user or post has no image.
pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

/// The origin assets are served from: the API base without its `/api` suffix.
pub fn asset_origin(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/api").unwrap_or(trimmed).to_string()
}

/// Resolve a server-relative image path into a fetchable URL.
pub fn resolve_image_url(origin: &str, path: Option<&str>) -> String {
    match path {
        None | Some("") => DEFAULT_AVATAR.to_string(),
        Some(path) if path.starts_with("http") => path.to_string(),
        Some(path) if path.starts_with('/') => format!("{}{}", origin, path),
        Some(path) => format!("{}/{}", origin, path),
    }
}

impl ApiClient {
    pub fn resolve_image_url(&self, path: Option<&str>) -> String {
        resolve_image_url(self.asset_origin(), path)
    }
}
