//! List stored posts

use anyhow::Result;

use crate::Blog;

/// Print every post as `slug - title`, in store order
pub async fn run(blog: &Blog) -> Result<()> {
    let posts = blog.store().list().await?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!("  {} - {}", post.slug, post.title);
    }

    Ok(())
}
