//! Print a single post

use anyhow::Result;

use crate::Blog;

/// Print a post's rendered HTML, or its markdown when `raw` is set
pub async fn run(blog: &Blog, slug: &str, raw: bool) -> Result<()> {
    let store = blog.store();

    if raw {
        let post = store.fetch_raw(slug).await?;
        println!("# {}\n", post.title);
        print!("{}", post.markdown);
    } else {
        let post = store.fetch_rendered(slug).await?;
        println!("<h1>{}</h1>", crate::helpers::html_escape(&post.title));
        print!("{}", post.html);
    }

    Ok(())
}
