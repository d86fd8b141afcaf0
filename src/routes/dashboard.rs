use crate::auth::Guarded;
use crate::routes::home::PostCard;
use crate::routes::{protected, Notice};
use crate::state::AppState;

/// The signed-in user's own posts.
pub async fn index(state: &AppState) -> Guarded<Option<Vec<PostCard>>> {
    protected(state, || my_posts(state)).await
}

/// Delete one of the user's posts and reload the list.
pub async fn delete(state: &AppState, id: i64) -> Guarded<Option<Vec<PostCard>>> {
    protected(state, || async move {
        match state.api.delete_post(id).await {
            Ok(()) => state.notify(Notice::success("Post deleted successfully")),
            Err(e) => {
                tracing::warn!("Failed to delete post {}: {}", id, e);
                state.notify(Notice::from_error(&e, "Failed to delete post"));
            }
        }
        my_posts(state).await
    })
    .await
}

async fn my_posts(state: &AppState) -> Option<Vec<PostCard>> {
    let username = state.username()?;
    match state.api.list_posts().await {
        Ok(posts) => Some(
            posts
                .iter()
                .filter(|p| p.author_username == username)
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
