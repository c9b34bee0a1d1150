//! mdblog: a minimal markdown blog engine
//!
//! Posts are markdown files with a `title` front-matter header, kept one per
//! file in a single directory. They are listed, rendered to HTML, and edited
//! through web forms.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Post store directory
    pub posts_dir: PathBuf,
    /// Static asset directory, when configured
    pub static_dir: Option<PathBuf>,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let static_dir = config.static_dir.as_ref().map(|dir| base_dir.join(dir));

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            static_dir,
        })
    }

    /// Post store over the configured posts directory
    pub fn store(&self) -> content::PostStore {
        content::PostStore::with_renderer(
            &self.posts_dir,
            content::MarkdownRenderer::from_config(&self.config.highlight),
        )
    }

    /// Start the web server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
