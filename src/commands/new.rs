//! Create a new post

use anyhow::Result;
use std::path::Path;

use crate::content::{ParsedPost, Post};
use crate::Blog;

/// Create a new post from the command line
///
/// Unlike the store's `create`, this refuses to replace an existing post.
pub async fn create_post(
    blog: &Blog,
    title: &str,
    slug: Option<&str>,
    file: Option<&Path>,
) -> Result<ParsedPost> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };

    let markdown = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => format!("# {}\n", title),
    };

    let store = blog.store();
    let path = store.post_path(&slug)?;
    if tokio::fs::try_exists(&path).await? {
        anyhow::bail!("Post already exists: {:?}", path);
    }

    tokio::fs::create_dir_all(store.root()).await?;
    let post = store.create(&Post::new(slug, title, markdown)).await?;

    println!("Created: {:?}", path);

    Ok(post)
}
