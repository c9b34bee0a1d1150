//! Post models

use serde::Serialize;

/// A blog post as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Slug (filename stem and URL segment)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Raw markdown body
    pub markdown: String,
}

impl Post {
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            markdown: markdown.into(),
        }
    }
}

/// A post with its body rendered to HTML, computed on read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPost {
    pub slug: String,
    pub title: String,
    /// Rendered HTML content
    pub html: String,
}

/// One entry of a post listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
}

/// An edited post together with the slug it was loaded under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub post: Post,
    pub old_slug: String,
}

impl PostUpdate {
    pub fn new(post: Post, old_slug: impl Into<String>) -> Self {
        Self {
            post,
            old_slug: old_slug.into(),
        }
    }

    /// Whether the update moves the post to a different file
    pub fn renames(&self) -> bool {
        self.post.slug != self.old_slug
    }
}
