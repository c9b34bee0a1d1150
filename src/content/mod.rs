//! Content module - post files, front-matter, and markdown rendering

pub mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod store;

pub use error::StoreError;
pub use frontmatter::FrontMatter;
pub use markdown::{MarkdownRenderer, RenderMarkdown};
pub use post::{ParsedPost, Post, PostSummary, PostUpdate};
pub use store::PostStore;
