use reqwest::Method;

use crate::api::client::Payload;
use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{Comment, CommentRequest};

impl ApiClient {
    pub async fn list_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        self.send_json(
            Method::GET,
            &format!("posts/{}/comments", post_id),
            Payload::Empty,
        )
        .await
    }

    pub async fn add_comment(&self, post_id: i64, content: &str) -> ApiResult<Comment> {
        let body = CommentRequest {
            content: content.to_string(),
        };
        self.send_json(
            Method::POST,
            &format!("posts/{}/comments", post_id),
            Payload::json(&body)?,
        )
        .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        self.send_empty(
            Method::DELETE,
            &format!("posts/comments/{}", comment_id),
            Payload::Empty,
        )
        .await
    }
}
