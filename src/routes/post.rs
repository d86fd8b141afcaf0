use std::fmt;

use crate::models::{BlogPost, Comment};
use crate::routes::{Notice, Route};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: BlogPost,
    pub comments: Vec<Comment>,
    pub is_owner: bool,
    pub author_avatar: String,
    pub image_urls: Vec<String>,
}

impl fmt::Display for PostDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let post = &self.post;
        writeln!(f, "{}", post.title)?;
        writeln!(f, "by {} on {}", post.author_username, post.created_on())?;
        writeln!(f)?;
        writeln!(f, "{}", post.content)?;
        for url in &self.image_urls {
            writeln!(f, "[image] {}", url)?;
        }
        writeln!(f)?;
        let heart = if post.liked_by_current_user { "♥" } else { "♡" };
        writeln!(
            f,
            "{} {}  💬 {} Comments",
            heart,
            post.like_count,
            self.comments.len()
        )?;
        for comment in &self.comments {
            writeln!(
                f,
                "  [{}] {} ({}): {}",
                comment.id,
                comment.username,
                comment.created_on(),
                comment.content
            )?;
        }
        if self.is_owner {
            write!(f, "(you can edit or delete this post)")?;
        }
        Ok(())
    }
}

/// Load a post and its comments. A missing post sends the user home.
pub async fn show(state: &AppState, id: i64) -> Option<PostDetail> {
    let post = match state.api.get_post(id).await {
        Ok(post) => post,
        Err(e) => {
            tracing::warn!("Failed to fetch post {}: {}", id, e);
            state.notify(Notice::error("Failed to fetch post"));
            state.navigate(Route::Home);
            return None;
        }
    };

    let comments = match state.api.list_comments(id).await {
        Ok(comments) => comments,
        Err(e) => {
            tracing::error!("Failed to fetch comments for post {}: {}", id, e);
            Vec::new()
        }
    };

    Some(detail(state, post, comments))
}

fn detail(state: &AppState, post: BlogPost, comments: Vec<Comment>) -> PostDetail {
    let is_owner = state.session.is_authenticated()
        && state.username().as_deref() == Some(post.author_username.as_str());
    PostDetail {
        author_avatar: state.api.image_url(post.author_profile_image.as_deref()),
        image_urls: post
            .images()
            .iter()
            .map(|i| state.api.image_url(Some(i)))
            .collect(),
        post,
        comments,
        is_owner,
    }
}

/// Toggle the like and return the re-fetched post.
pub async fn like(state: &AppState, id: i64) -> Option<BlogPost> {
    if !state.session.is_authenticated() {
        state.notify(Notice::error("Please login to like posts"));
        return None;
    }

    if let Err(e) = state.api.toggle_like(id).await {
        tracing::warn!("Failed to toggle like on post {}: {}", id, e);
        state.notify(Notice::error("Failed to toggle like"));
        return None;
    }

    match state.api.get_post(id).await {
        Ok(post) => Some(post),
        Err(e) => {
            tracing::warn!("Failed to refresh post {}: {}", id, e);
            state.notify(Notice::error("Failed to fetch post"));
            None
        }
    }
}

/// Blank comments are ignored without a request.
pub async fn add_comment(state: &AppState, id: i64, text: &str) -> Option<PostDetail> {
    if !state.session.is_authenticated() {
        state.notify(Notice::error("Please login to comment"));
        return None;
    }
    if text.trim().is_empty() {
        return None;
    }

    if let Err(e) = state.api.add_comment(id, text).await {
        tracing::warn!("Failed to add comment to post {}: {}", id, e);
        state.notify(Notice::error("Failed to add comment"));
        return None;
    }

    let refreshed = show(state, id).await;
    state.notify(Notice::success("Comment added"));
    refreshed
}

pub async fn delete_comment(state: &AppState, post_id: i64, comment_id: i64) -> Option<PostDetail> {
    if let Err(e) = state.api.delete_comment(comment_id).await {
        tracing::warn!("Failed to delete comment {}: {}", comment_id, e);
        state.notify(Notice::error("Failed to delete comment"));
        return None;
    }

    let refreshed = show(state, post_id).await;
    state.notify(Notice::success("Comment deleted"));
    refreshed
}

/// Delete the post and go to the dashboard.
pub async fn delete_post(state: &AppState, id: i64) -> bool {
    match state.api.delete_post(id).await {
        Ok(()) => {
            state.notify(Notice::success("Post deleted successfully"));
            state.navigate(Route::Dashboard);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to delete post {}: {}", id, e);
            state.notify(Notice::from_error(&e, "Failed to delete post"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{harness, session, signed_in};

    #[tokio::test]
    async fn show_marks_owner() {
        let h = harness(signed_in("alice"), |api| {
            api.with_post(1, "alice", "Mine")
                .with_post(2, "bob", "His")
                .with_comment(1, 10, "bob", "Nice")
        });

        let mine = show(&h.state, 1).await.unwrap();
        assert!(mine.is_owner);
        assert_eq!(mine.comments.len(), 1);

        let his = show(&h.state, 2).await.unwrap();
        assert!(!his.is_owner);
    }

    #[tokio::test]
    async fn signed_out_viewer_is_never_owner() {
        let h = harness(session(), |api| api.with_post(1, "alice", "Mine"));
        assert!(!show(&h.state, 1).await.unwrap().is_owner);
    }

    #[tokio::test]
    async fn missing_post_redirects_home() {
        let h = harness(session(), |api| api);
        assert!(show(&h.state, 404).await.is_none());
        assert_eq!(h.history.visited(), vec![Route::Home]);
        assert_eq!(h.notices.drain(), vec![Notice::error("Failed to fetch post")]);
    }

    #[tokio::test]
    async fn comment_fetch_failure_shows_empty_list() {
        let h = harness(session(), |api| api.with_post(1, "alice", "Mine"));
        h.api.fail("list_comments");
        let detail = show(&h.state, 1).await.unwrap();
        assert!(detail.comments.is_empty());
        assert!(h.notices.drain().is_empty());
    }

    #[tokio::test]
    async fn like_requires_login_and_sends_nothing() {
        let h = harness(session(), |api| api.with_post(1, "alice", "Mine"));
        assert!(like(&h.state, 1).await.is_none());
        assert_eq!(h.notices.drain(), vec![Notice::error("Please login to like posts")]);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn like_twice_toggles_back() {
        let h = harness(signed_in("bob"), |api| api.with_post(42, "alice", "Post"));

        let first = like(&h.state, 42).await.unwrap();
        assert!(first.liked_by_current_user);
        assert_eq!(first.like_count, 1);

        let second = like(&h.state, 42).await.unwrap();
        assert!(!second.liked_by_current_user);
        assert_eq!(second.like_count, 0);
        assert_eq!(
            h.api.calls(),
            vec!["toggle_like", "get_post", "toggle_like", "get_post"]
        );
    }

    #[tokio::test]
    async fn blank_comment_is_ignored() {
        let h = harness(signed_in("bob"), |api| api.with_post(1, "alice", "Post"));
        assert!(add_comment(&h.state, 1, "   \n").await.is_none());
        assert!(h.api.calls().is_empty());
        assert!(h.notices.drain().is_empty());
    }

    #[tokio::test]
    async fn comment_refreshes_detail() {
        let h = harness(signed_in("bob"), |api| api.with_post(1, "alice", "Post"));
        let detail = add_comment(&h.state, 1, "Great read").await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].username, "bob");
        assert_eq!(detail.post.comment_count, Some(1));
        assert_eq!(h.notices.drain(), vec![Notice::success("Comment added")]);
    }

    #[tokio::test]
    async fn comment_requires_login() {
        let h = harness(session(), |api| api.with_post(1, "alice", "Post"));
        assert!(add_comment(&h.state, 1, "hi").await.is_none());
        assert_eq!(h.notices.drain(), vec![Notice::error("Please login to comment")]);
    }

    #[tokio::test]
    async fn delete_comment_refreshes_detail() {
        let h = harness(signed_in("bob"), |api| {
            api.with_post(1, "alice", "Post").with_comment(1, 10, "bob", "oops")
        });
        let detail = delete_comment(&h.state, 1, 10).await.unwrap();
        assert!(detail.comments.is_empty());
        assert_eq!(h.notices.drain(), vec![Notice::success("Comment deleted")]);
    }

    #[tokio::test]
    async fn deleting_someone_elses_post_surfaces_server_message() {
        let h = harness(signed_in("bob"), |api| api.with_post(1, "alice", "Post"));
        assert!(!delete_post(&h.state, 1).await);
        assert_eq!(
            h.notices.drain(),
            vec![Notice::error("You can only delete your own posts")]
        );
        assert!(h.history.visited().is_empty());
    }

    #[tokio::test]
    async fn deleting_own_post_goes_to_dashboard() {
        let h = harness(signed_in("alice"), |api| api.with_post(1, "alice", "Post"));
        assert!(delete_post(&h.state, 1).await);
        assert_eq!(h.history.visited(), vec![Route::Dashboard]);
    }
}
