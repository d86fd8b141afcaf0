use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bloghub::api::ApiClient;
use bloghub::auth::{FileStorage, Guarded, SessionStore};
use bloghub::config::{Cli, Command, Config};
use bloghub::models::ImageUpload;
use bloghub::routes::{self, History, Notices, Route};
use bloghub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Parse CLI args and load config
    let cli = Cli::parse();
    let data_dir = Config::data_dir(&cli);
    std::fs::create_dir_all(&data_dir)?;
    tracing::debug!("Data directory: {}", data_dir.display());

    let config = Config::load(&cli)?;

    // Restore the stored session
    let storage = Arc::new(FileStorage::open(config.session_path()));
    let session = Arc::new(SessionStore::restore(storage));

    let api = ApiClient::new(&config.api.base_url, session.clone())
        .with_context(|| format!("Invalid API base URL: {}", config.api.base_url))?
        .with_logout_on_unauthorized(config.session.logout_on_unauthorized);
    tracing::debug!("Using API at {}", api.base_url());

    let history = Arc::new(History::default());
    let notices = Arc::new(Notices::default());
    let state = AppState {
        config,
        session,
        api: Arc::new(api),
        navigator: history.clone(),
        notifier: notices.clone(),
    };

    run(&state, cli.command).await?;

    for notice in notices.drain() {
        if notice.is_error() {
            eprintln!("{}", notice);
        } else {
            println!("{}", notice);
        }
    }

    if history.last() == Some(Route::Login) {
        eprintln!("Sign in first: bloghub login --email <EMAIL> --password <PASSWORD>");
    }

    Ok(())
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Register {
            username,
            email,
            password,
        } => {
            if let Some(user) = routes::auth::register(state, &username, &email, &password).await {
                println!("Signed in as {}", user.username);
            }
        }
        Command::Login { email, password } => {
            if let Some(user) = routes::auth::login(state, &email, &password).await {
                println!("Signed in as {}", user.username);
            }
        }
        Command::Logout => routes::navbar::logout(state),
        Command::Whoami => println!("{}", routes::navbar::render(state)),
        Command::Posts => {
            if let Some(cards) = routes::home::index(state).await {
                print_list(&cards, "No posts yet.");
            }
        }
        Command::Show { id } => {
            if let Some(detail) = routes::post::show(state, id).await {
                println!("{}", detail);
            }
        }
        Command::Like { id } => {
            if let Some(post) = routes::post::like(state, id).await {
                let heart = if post.liked_by_current_user { "♥" } else { "♡" };
                println!("{} {} likes", heart, post.like_count);
            }
        }
        Command::Comment { id, text } => {
            if let Some(detail) = routes::post::add_comment(state, id, &text).await {
                println!("{}", detail);
            }
        }
        Command::DeleteComment {
            post_id,
            comment_id,
        } => {
            if let Some(detail) = routes::post::delete_comment(state, post_id, comment_id).await {
                println!("{}", detail);
            }
        }
        Command::Dashboard => {
            if let Guarded::Content(Some(cards)) = routes::dashboard::index(state).await {
                print_list(&cards, "You haven't written any posts yet.");
            }
        }
        Command::Create {
            title,
            content,
            images,
        } => {
            let form = routes::editor::PostForm::new(title, content)
                .with_images(read_images(&images).await?);
            if let Guarded::Content(Some(post)) = routes::editor::create(state, form).await {
                println!("Published post #{}", post.id);
            }
        }
        Command::Edit {
            id,
            title,
            content,
            images,
        } => {
            let images = read_images(&images).await?;
            if let Guarded::Content(Some(mut form)) = routes::editor::load(state, id).await {
                if let Some(title) = title {
                    form.title = title;
                }
                if let Some(content) = content {
                    form.content = content;
                }
                form.images = images;
                if let Guarded::Content(Some(post)) = routes::editor::update(state, id, form).await
                {
                    println!("Updated post #{}", post.id);
                }
            }
        }
        Command::Delete { id } => {
            routes::post::delete_post(state, id).await;
        }
        Command::Profile => {
            if let Guarded::Content(Some(profile)) = routes::profile::show(state).await {
                println!("{}", profile);
            }
        }
        Command::Avatar { file } => {
            let image = ImageUpload::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            if let Guarded::Content(Some(profile)) =
                routes::profile::upload_avatar(state, image).await
            {
                println!("{}", profile);
            }
        }
    }
    Ok(())
}

async fn read_images(paths: &[PathBuf]) -> anyhow::Result<Vec<ImageUpload>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let image = ImageUpload::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        images.push(image);
    }
    Ok(images)
}

fn print_list<T: Display>(items: &[T], empty: &str) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    for item in items {
        println!("{}\n", item);
    }
}
