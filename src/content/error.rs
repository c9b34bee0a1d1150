//! Errors raised by the post store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single post store operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// The post file has no front-matter `title`
    #[error("{} has bad meta data: missing title", .path.display())]
    MissingTitle { path: PathBuf },

    /// The front-matter block is not valid YAML
    #[error("failed to parse front-matter in {}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the requested post file does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
