//! Post store - one markdown file per post in a flat directory
//!
//! The store keeps no state between calls. Every operation goes back to the
//! filesystem, and nothing coordinates concurrent writers to the same slug:
//! the last rename to land wins.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;

use super::error::{Result, StoreError};
use super::markdown::{MarkdownRenderer, RenderMarkdown};
use super::post::{ParsedPost, Post, PostSummary, PostUpdate};
use super::FrontMatter;

/// Extension of post files
const POST_EXT: &str = ".md";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reads and writes posts stored as `<root>/<slug>.md`
pub struct PostStore<R = MarkdownRenderer> {
    root: PathBuf,
    renderer: Arc<R>,
}

impl<R> Clone for PostStore<R> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl PostStore<MarkdownRenderer> {
    /// Create a store rooted at `root` with the default markdown renderer
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_renderer(root, MarkdownRenderer::new())
    }
}

impl<R: RenderMarkdown> PostStore<R> {
    pub fn with_renderer(root: impl Into<PathBuf>, renderer: R) -> Self {
        Self {
            root: root.into(),
            renderer: Arc::new(renderer),
        }
    }

    /// Directory holding the post files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `slug`
    pub fn post_path(&self, slug: &str) -> Result<PathBuf> {
        validate_slug(slug)?;
        Ok(self.root.join(format!("{slug}{POST_EXT}")))
    }

    /// List every post in directory order
    ///
    /// A single file without a title fails the whole listing.
    pub async fn list(&self) -> Result<Vec<PostSummary>> {
        let mut dir = fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let mut posts = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.root, e))?
        {
            let file_name = entry.file_name();
            let Some(slug) = file_name.to_str().and_then(slug_from_filename) else {
                continue;
            };

            let path = entry.path();
            let metadata = fs::metadata(&path)
                .await
                .map_err(|e| StoreError::io(&path, e))?;
            if !metadata.is_file() {
                continue;
            }

            let (title, _) = read_post(&path).await?;
            posts.push(PostSummary {
                slug: slug.to_string(),
                title,
            });
        }

        Ok(posts)
    }

    /// Load a post and render its body to HTML
    pub async fn fetch_rendered(&self, slug: &str) -> Result<ParsedPost> {
        let path = self.post_path(slug)?;
        let (title, body) = read_post(&path).await?;
        let html = self
            .renderer
            .render(&body)
            .map_err(|source| StoreError::Render { path, source })?;

        Ok(ParsedPost {
            slug: slug.to_string(),
            title,
            html,
        })
    }

    /// Load a post with its markdown body untouched
    pub async fn fetch_raw(&self, slug: &str) -> Result<Post> {
        let path = self.post_path(slug)?;
        let (title, markdown) = read_post(&path).await?;

        Ok(Post {
            slug: slug.to_string(),
            title,
            markdown,
        })
    }

    /// Write a post, replacing any existing file with the same slug
    pub async fn create(&self, post: &Post) -> Result<ParsedPost> {
        let path = self.post_path(&post.slug)?;
        write_post(&self.root, &path, post).await?;
        self.fetch_rendered(&post.slug).await
    }

    /// Rewrite a post, moving it when the slug changed
    ///
    /// The old file must exist when the slug changes. The new file lands
    /// before the old one is removed, so an interrupted rename leaves both.
    pub async fn update(&self, update: &PostUpdate) -> Result<ParsedPost> {
        let post = &update.post;
        let path = self.post_path(&post.slug)?;

        if update.renames() {
            let old_path = self.post_path(&update.old_slug)?;

            if update.old_slug.to_lowercase() == post.slug.to_lowercase() {
                // Case-only change may name the same file on this filesystem
                fs::rename(&old_path, &path)
                    .await
                    .map_err(|e| StoreError::io(&old_path, e))?;
                write_post(&self.root, &path, post).await?;
            } else {
                fs::metadata(&old_path)
                    .await
                    .map_err(|e| StoreError::io(&old_path, e))?;
                write_post(&self.root, &path, post).await?;

                // Both slugs can still resolve to one file, e.g. under Unicode
                // case folding or normalization
                if is_same_file(&old_path, &path).await? {
                    tracing::debug!("{:?} is now {:?}, keeping it", old_path, path);
                } else {
                    fs::remove_file(&old_path)
                        .await
                        .map_err(|e| StoreError::io(&old_path, e))?;
                }
            }
        } else {
            write_post(&self.root, &path, post).await?;
        }

        self.fetch_rendered(&post.slug).await
    }
}

/// Read a post file, returning its title and body
async fn read_post(path: &Path) -> Result<(String, String)> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    let (fm, body) = FrontMatter::parse(&content).map_err(|source| StoreError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;

    let title = fm
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| StoreError::MissingTitle {
            path: path.to_path_buf(),
        })?;

    Ok((title, body.to_string()))
}

/// Write through a temporary sibling so readers never see a partial file
async fn write_post(root: &Path, path: &Path, post: &Post) -> Result<()> {
    let text =
        FrontMatter::format_post(&post.title, &post.markdown).map_err(|source| {
            StoreError::FrontMatter {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let tmp_path = root.join(format!(
        ".{}{}.{}-{}.tmp",
        post.slug,
        POST_EXT,
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    fs::write(&tmp_path, text)
        .await
        .map_err(|e| StoreError::io(&tmp_path, e))?;

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(StoreError::io(path, e));
    }

    Ok(())
}

/// Whether two paths name the same file on disk
async fn is_same_file(a: &Path, b: &Path) -> Result<bool> {
    let (a_path, b_path) = (a.to_path_buf(), b.to_path_buf());
    tokio::task::spawn_blocking(move || same_file::is_same_file(&a_path, &b_path))
        .await
        .map_err(|e| StoreError::io(a, io::Error::other(e)))?
        .map_err(|e| StoreError::io(a, e))
}

/// Slug of a post file name, or None for anything that is not a post
fn slug_from_filename(name: &str) -> Option<&str> {
    if name.starts_with('.') {
        return None;
    }
    name.strip_suffix(POST_EXT).filter(|slug| !slug.is_empty())
}

/// A slug must name exactly one file inside the store directory
fn validate_slug(slug: &str) -> Result<()> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0']);

    if is_valid {
        Ok(())
    } else {
        Err(StoreError::InvalidSlug(slug.to_string()))
    }
}
