//! Web server: public post pages and the admin editor

mod forms;
pub mod views;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use forms::{FormErrors, PostForm};
use views::FormMode;

use crate::config::BlogConfig;
use crate::content::{ParsedPost, PostStore, PostSummary, PostUpdate, StoreError};
use crate::Blog;

/// Server state
pub struct AppState {
    pub store: PostStore,
    pub config: BlogConfig,
}

type SharedState = Arc<AppState>;

/// Store failure surfaced to the browser
pub struct AppError {
    site_title: String,
    error: StoreError,
}

impl AppError {
    fn new(state: &AppState, error: StoreError) -> Self {
        Self {
            site_title: state.config.title.clone(),
            error,
        }
    }

    fn status(&self) -> StatusCode {
        match &self.error {
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            StoreError::InvalidSlug(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let heading = status.canonical_reason().unwrap_or("Error");

        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
            self.error.to_string()
        } else {
            tracing::warn!("Request rejected: {}", self.error);
            match status {
                StatusCode::NOT_FOUND => "No such post.".to_string(),
                _ => self.error.to_string(),
            }
        };

        let body = views::error_page(&self.site_title, heading, &message);
        (status, Html(body)).into_response()
    }
}

/// Build the application router
pub fn router(state: SharedState, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/posts", get(posts_index))
        .route("/posts/:slug", get(post_show))
        .route("/admin", get(admin_index))
        .route("/admin/new", get(admin_new).post(admin_create))
        .route("/admin/:slug", get(admin_edit).post(admin_update))
        .route("/api/posts", get(api_posts))
        .route("/api/posts/:slug", get(api_post));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    tokio::fs::create_dir_all(&blog.posts_dir).await?;

    let state = Arc::new(AppState {
        store: blog.store(),
        config: blog.config.clone(),
    });
    let app = router(state, blog.static_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Serving posts from {:?}", blog.posts_dir);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Redirect {
    Redirect::to("/posts")
}

async fn posts_index(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let posts = state
        .store
        .list()
        .await
        .map_err(|e| AppError::new(&state, e))?;
    Ok(Html(views::posts_index(&state.config.title, &posts)))
}

async fn post_show(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = state
        .store
        .fetch_rendered(&slug)
        .await
        .map_err(|e| AppError::new(&state, e))?;
    Ok(Html(views::post_page(&state.config.title, &post)))
}

async fn admin_index(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    let posts = state
        .store
        .list()
        .await
        .map_err(|e| AppError::new(&state, e))?;
    Ok(Html(views::admin_index(&state.config.title, &posts)))
}

async fn admin_new(State(state): State<SharedState>) -> Html<String> {
    Html(views::post_form(
        &state.config.title,
        FormMode::Create,
        &PostForm::default(),
        &FormErrors::default(),
    ))
}

async fn admin_create(
    State(state): State<SharedState>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    submit_delay(&state).await;

    let post = match form.validate() {
        Ok(post) => post,
        Err(errors) => return Ok(invalid_form(&state, FormMode::Create, &form, &errors)),
    };

    state
        .store
        .create(&post)
        .await
        .map_err(|e| AppError::new(&state, e))?;
    tracing::info!("Created post {}", post.slug);

    Ok(Redirect::to("/admin").into_response())
}

async fn admin_edit(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = state
        .store
        .fetch_raw(&slug)
        .await
        .map_err(|e| AppError::new(&state, e))?;

    Ok(Html(views::post_form(
        &state.config.title,
        FormMode::Edit { slug: &slug },
        &PostForm::from_post(&post),
        &FormErrors::default(),
    )))
}

async fn admin_update(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    submit_delay(&state).await;

    let mode = FormMode::Edit { slug: &slug };
    let post = match form.validate() {
        Ok(post) => post,
        Err(errors) => return Ok(invalid_form(&state, mode, &form, &errors)),
    };

    let update = PostUpdate::new(post, form.old_slug_or(&slug));
    state
        .store
        .update(&update)
        .await
        .map_err(|e| AppError::new(&state, e))?;

    if update.renames() {
        tracing::info!("Moved post {} to {}", update.old_slug, update.post.slug);
    } else {
        tracing::info!("Updated post {}", update.post.slug);
    }

    Ok(Redirect::to("/admin").into_response())
}

async fn api_posts(State(state): State<SharedState>) -> Result<Json<Vec<PostSummary>>, AppError> {
    let posts = state
        .store
        .list()
        .await
        .map_err(|e| AppError::new(&state, e))?;
    Ok(Json(posts))
}

async fn api_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<ParsedPost>, AppError> {
    let post = state
        .store
        .fetch_rendered(&slug)
        .await
        .map_err(|e| AppError::new(&state, e))?;
    Ok(Json(post))
}

/// Re-render a rejected form with the submitted values
fn invalid_form(
    state: &AppState,
    mode: FormMode<'_>,
    form: &PostForm,
    errors: &FormErrors,
) -> Response {
    tracing::debug!("Rejected form submission: {:?}", errors);
    let body = views::post_form(&state.config.title, mode, form, errors);
    (StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response()
}

async fn submit_delay(state: &AppState) {
    if state.config.submit_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(state.config.submit_delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::LOCATION;
    use tempfile::TempDir;

    use crate::content::Post;

    fn setup() -> (TempDir, SharedState) {
        let dir = TempDir::new().unwrap();
        let state = Arc::new(AppState {
            store: PostStore::new(dir.path()),
            config: BlogConfig::default(),
        });
        (dir, state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form(title: &str, slug: &str, markdown: &str, old_slug: Option<&str>) -> PostForm {
        PostForm {
            title: title.to_string(),
            slug: slug.to_string(),
            markdown: markdown.to_string(),
            old_slug: old_slug.map(str::to_string),
        }
    }

    #[test]
    fn test_router_builds() {
        let (dir, state) = setup();
        let _ = router(state, Some(dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_index_redirects_to_posts() {
        let response = index().await.into_response();
        assert_eq!(response.headers()[LOCATION], "/posts");
    }

    #[tokio::test]
    async fn test_posts_index_lists_titles() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("my-first-post", "My First Post", "# Hello"))
            .await
            .unwrap();

        let response = posts_index(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"<a href="/posts/my-first-post">My First Post</a>"#));
    }

    #[tokio::test]
    async fn test_bad_post_breaks_listing() {
        let (dir, state) = setup();
        std::fs::write(dir.path().join("bad.md"), "no front matter").unwrap();

        let response = admin_index(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("missing title"));
    }

    #[tokio::test]
    async fn test_post_show() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("hello", "Hello", "Some *text*"))
            .await
            .unwrap();

        let response = post_show(State(state), Path("hello".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("<h1>Hello</h1>"));
        assert!(body.contains("<p>Some <em>text</em></p>"));
    }

    #[tokio::test]
    async fn test_api_returns_json() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("hello", "Hello", "# Hi"))
            .await
            .unwrap();

        let response = api_posts(State(state.clone())).await.into_response();
        let posts: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(posts, serde_json::json!([{ "slug": "hello", "title": "Hello" }]));

        let response = api_post(State(state), Path("hello".to_string()))
            .await
            .into_response();
        let post: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(post["html"], "<h1>Hi</h1>\n");
    }

    #[tokio::test]
    async fn test_unknown_post_is_404() {
        let (_dir, state) = setup();
        let response = post_show(State(state.clone()), Path("ghost".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = admin_edit(State(state), Path("ghost".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_slug_is_400() {
        let (_dir, state) = setup();
        let response = admin_create(State(state), Form(form("T", "../up", "M", None)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_redirects_to_admin() {
        let (_dir, state) = setup();
        let response = admin_create(
            State(state.clone()),
            Form(form("Hello", "hello", "# Hi", None)),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/admin");
        assert_eq!(
            state.store.fetch_raw("hello").await.unwrap(),
            Post::new("hello", "Hello", "# Hi")
        );
    }

    #[tokio::test]
    async fn test_create_with_missing_fields_rerenders_form() {
        let (dir, state) = setup();
        let response = admin_create(State(state), Form(form("", "kept-slug", "", None)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(response).await;
        assert!(body.contains("Title is required"));
        assert!(body.contains("Markdown is required"));
        assert!(!body.contains("Slug is required"));
        assert!(body.contains(r#"value="kept-slug""#));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_create_with_reserved_slug_is_rejected() {
        let (dir, state) = setup();
        let response = admin_create(State(state), Form(form("New", "new", "body", None)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains(r#"Slug "new" is reserved"#));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_edit_form_is_prefilled() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("a", "Title A", "Body A"))
            .await
            .unwrap();

        let response = admin_edit(State(state), Path("a".to_string()))
            .await
            .into_response();
        let body = body_text(response).await;
        assert!(body.contains(r#"<input type="hidden" name="oldSlug" value="a">"#));
        assert!(body.contains(r#"value="Title A""#));
        assert!(body.contains(">Body A</textarea>"));
    }

    #[tokio::test]
    async fn test_update_renames_post() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("a", "Old", "old"))
            .await
            .unwrap();

        let response = admin_update(
            State(state.clone()),
            Path("a".to_string()),
            Form(form("New", "b", "new", Some("a"))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.store.fetch_raw("a").await.unwrap_err().is_not_found());
        assert_eq!(
            state.store.fetch_raw("b").await.unwrap(),
            Post::new("b", "New", "new")
        );
    }

    #[tokio::test]
    async fn test_update_without_old_slug_uses_route() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("a", "Old", "old"))
            .await
            .unwrap();

        admin_update(
            State(state.clone()),
            Path("a".to_string()),
            Form(form("Moved", "c", "moved", None)),
        )
        .await
        .into_response();

        let posts = state.store.list().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "c");
    }

    #[tokio::test]
    async fn test_update_with_missing_fields_keeps_post() {
        let (_dir, state) = setup();
        state
            .store
            .create(&Post::new("a", "Old", "old"))
            .await
            .unwrap();

        let response = admin_update(
            State(state.clone()),
            Path("a".to_string()),
            Form(form("New", "", "new", Some("a"))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Slug is required"));
        assert_eq!(state.store.fetch_raw("a").await.unwrap().title, "Old");
    }
}
