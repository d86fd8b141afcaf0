//! In-memory `BlogApi` for exercising views without a server.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::api::{resolve_image_url, BlogApi};
use crate::auth::{MemoryStorage, SessionStore};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, BlogPost, Comment, ImageUpload, ProfileImageResponse, User};
use crate::routes::{History, Notices};
use crate::state::AppState;

#[derive(Default)]
pub(crate) struct FakeData {
    pub posts: Vec<BlogPost>,
    pub comments: Vec<(i64, Comment)>,
    pub liked: HashSet<i64>,
    pub calls: Vec<&'static str>,
    pub failing: HashSet<&'static str>,
    next_id: i64,
}

pub(crate) struct FakeApi {
    session: Arc<SessionStore>,
    data: Mutex<FakeData>,
}

impl FakeApi {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            data: Mutex::new(FakeData {
                next_id: 100,
                ..FakeData::default()
            }),
        }
    }

    pub fn with_post(self, id: i64, author: &str, title: &str) -> Self {
        self.lock().posts.push(sample_post(id, author, title));
        self
    }

    pub fn with_comment(self, post_id: i64, id: i64, username: &str, content: &str) -> Self {
        self.lock().comments.push((
            post_id,
            Comment {
                id,
                content: content.to_string(),
                username: username.to_string(),
                user_profile_image: None,
                created_at: "2024-03-05T10:15:00".to_string(),
            },
        ));
        self
    }

    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn lock(&self) -> MutexGuard<'_, FakeData> {
        self.data.lock().unwrap()
    }

    fn call(&self, op: &'static str) -> ApiResult<MutexGuard<'_, FakeData>> {
        let mut data = self.lock();
        data.calls.push(op);
        if data.failing.contains(op) {
            return Err(ApiError::from_status(500, r#"{"error":"boom"}"#));
        }
        Ok(data)
    }

    fn current_user(&self) -> ApiResult<User> {
        self.session
            .user()
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".into()))
    }

    fn decorate(data: &FakeData, mut post: BlogPost) -> BlogPost {
        post.liked_by_current_user = data.liked.contains(&post.id);
        post.comment_count = Some(data.comments.iter().filter(|(p, _)| *p == post.id).count() as i64);
        post
    }
}

#[async_trait]
impl BlogApi for FakeApi {
    async fn register(&self, username: &str, email: &str, _password: &str) -> ApiResult<AuthResponse> {
        let _data = self.call("register")?;
        Ok(AuthResponse {
            token: format!("token-{}", username),
            username: username.to_string(),
            email: email.to_string(),
        })
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<AuthResponse> {
        let _data = self.call("login")?;
        if password != "p" {
            return Err(ApiError::from_status(401, r#"{"error":"Invalid email or password"}"#));
        }
        Ok(AuthResponse {
            token: "t1".to_string(),
            username: "alice".to_string(),
            email: email.to_string(),
        })
    }

    async fn list_posts(&self) -> ApiResult<Vec<BlogPost>> {
        let data = self.call("list_posts")?;
        Ok(data
            .posts
            .iter()
            .cloned()
            .map(|p| Self::decorate(&data, p))
            .collect())
    }

    async fn get_post(&self, id: i64) -> ApiResult<BlogPost> {
        let data = self.call("get_post")?;
        let post = data
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, r#"{"error":"Post not found"}"#))?;
        Ok(Self::decorate(&data, post))
    }

    async fn create_post(&self, title: &str, content: &str, images: &[ImageUpload]) -> ApiResult<BlogPost> {
        let user = self.current_user()?;
        let mut data = self.call("create_post")?;
        data.next_id += 1;
        let mut post = sample_post(data.next_id, &user.username, title);
        post.content = content.to_string();
        post.images = Some(images.iter().map(|i| format!("/uploads/{}", i.file_name)).collect());
        data.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        images: Option<&[ImageUpload]>,
    ) -> ApiResult<BlogPost> {
        self.current_user()?;
        let mut data = self.call("update_post")?;
        let post = data
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::from_status(404, ""))?;
        post.title = title.to_string();
        post.content = content.to_string();
        if let Some(images) = images {
            post.images = Some(images.iter().map(|i| format!("/uploads/{}", i.file_name)).collect());
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, id: i64) -> ApiResult<()> {
        let user = self.current_user()?;
        let mut data = self.call("delete_post")?;
        let owner = data.posts.iter().find(|p| p.id == id).map(|p| p.author_username.clone());
        match owner {
            None => Err(ApiError::from_status(404, "")),
            Some(owner) if owner != user.username => {
                Err(ApiError::from_status(403, r#"{"error":"You can only delete your own posts"}"#))
            }
            Some(_) => {
                data.posts.retain(|p| p.id != id);
                Ok(())
            }
        }
    }

    async fn toggle_like(&self, id: i64) -> ApiResult<()> {
        self.current_user()?;
        let mut data = self.call("toggle_like")?;
        let liked = !data.liked.remove(&id);
        if liked {
            data.liked.insert(id);
        }
        if let Some(post) = data.posts.iter_mut().find(|p| p.id == id) {
            post.like_count += if liked { 1 } else { -1 };
        }
        Ok(())
    }

    async fn list_comments(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
        let data = self.call("list_comments")?;
        Ok(data
            .comments
            .iter()
            .filter(|(p, _)| *p == post_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn add_comment(&self, post_id: i64, content: &str) -> ApiResult<Comment> {
        let user = self.current_user()?;
        let mut data = self.call("add_comment")?;
        data.next_id += 1;
        let comment = Comment {
            id: data.next_id,
            content: content.to_string(),
            username: user.username,
            user_profile_image: user.profile_image,
            created_at: "2024-03-06T09:00:00".to_string(),
        };
        data.comments.push((post_id, comment.clone()));
        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: i64) -> ApiResult<()> {
        self.current_user()?;
        let mut data = self.call("delete_comment")?;
        data.comments.retain(|(_, c)| c.id != comment_id);
        Ok(())
    }

    async fn upload_profile_image(&self, image: &ImageUpload) -> ApiResult<ProfileImageResponse> {
        self.current_user()?;
        let _data = self.call("upload_profile_image")?;
        Ok(ProfileImageResponse {
            profile_image: format!("/uploads/profiles/{}", image.file_name),
        })
    }

    fn image_url(&self, path: Option<&str>) -> String {
        resolve_image_url("http://localhost:8080", path)
    }
}

pub(crate) fn sample_post(id: i64, author: &str, title: &str) -> BlogPost {
    BlogPost {
        id,
        title: title.to_string(),
        content: format!("Body of {}", title),
        author_username: author.to_string(),
        author_profile_image: None,
        images: None,
        like_count: 0,
        comment_count: Some(0),
        liked_by_current_user: false,
        created_at: "2024-03-05T10:15:00".to_string(),
        updated_at: "2024-03-05T10:15:00".to_string(),
    }
}

pub(crate) fn session() -> Arc<SessionStore> {
    Arc::new(SessionStore::restore(Arc::new(MemoryStorage::new())))
}

pub(crate) fn signed_in(username: &str) -> Arc<SessionStore> {
    let session = session();
    let user = User {
        username: username.to_string(),
        email: format!("{}@x.com", username),
        profile_image: None,
    };
    session.set_auth(user, format!("token-{}", username)).unwrap();
    session
}

pub(crate) struct Harness {
    pub state: AppState,
    pub api: Arc<FakeApi>,
    pub history: Arc<History>,
    pub notices: Arc<Notices>,
}

pub(crate) fn harness(session: Arc<SessionStore>, build: impl FnOnce(FakeApi) -> FakeApi) -> Harness {
    let api = Arc::new(build(FakeApi::new(session.clone())));
    let history = Arc::new(History::default());
    let notices = Arc::new(Notices::default());
    let state = AppState {
        config: Config::default(),
        session,
        api: api.clone(),
        navigator: history.clone(),
        notifier: notices.clone(),
    };
    Harness {
        state,
        api,
        history,
        notices,
    }
}
