use std::fmt;

use crate::api::BlogApi;
use crate::models::BlogPost;
use crate::routes::Notice;
use crate::state::AppState;

pub const EXCERPT_CHARS: usize = 200;
pub const PREVIEW_IMAGES: usize = 4;

/// A post as shown in a list.
#[derive(Debug, Clone, PartialEq)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub author_avatar: String,
    pub created_on: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked: bool,
    pub image_urls: Vec<String>,
    /// Images beyond the preview, shown as "+N".
    pub more_images: usize,
}

impl PostCard {
    pub fn from_post(api: &dyn BlogApi, post: &BlogPost) -> Self {
        let images = post.images();
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: excerpt(&post.content),
            author: post.author_username.clone(),
            author_avatar: api.image_url(post.author_profile_image.as_deref()),
            created_on: post.created_on(),
            like_count: post.like_count,
            comment_count: post.comment_count.unwrap_or(0),
            liked: post.liked_by_current_user,
            image_urls: images
                .iter()
                .take(PREVIEW_IMAGES)
                .map(|i| api.image_url(Some(i)))
                .collect(),
            more_images: images.len().saturating_sub(PREVIEW_IMAGES),
        }
    }
}

impl fmt::Display for PostCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.title)?;
        writeln!(f, "   by {} on {}", self.author, self.created_on)?;
        writeln!(f, "   {}", self.excerpt)?;
        if !self.image_urls.is_empty() {
            write!(f, "   images: {}", self.image_urls.join(", "))?;
            if self.more_images > 0 {
                write!(f, " +{}", self.more_images)?;
            }
            writeln!(f)?;
        }
        let heart = if self.liked { "♥" } else { "♡" };
        write!(
            f,
            "   {} {}  💬 {}",
            heart, self.like_count, self.comment_count
        )
    }
}

/// First 200 characters, with "..." when the content was cut.
pub fn excerpt(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// The public post list.
pub async fn index(state: &AppState) -> Option<Vec<PostCard>> {
    match state.api.list_posts().await {
        Ok(posts) => Some(
            posts
                .iter()
                .map(|p| PostCard::from_post(state.api.as_ref(), p))
                .collect(),
        ),
        Err(e) => {
            tracing::warn!("Failed to fetch posts: {}", e);
            state.notify(Notice::error("Failed to fetch posts"));
            None
        }
    }
}
