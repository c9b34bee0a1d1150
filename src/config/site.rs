//! Site configuration (_config.yml)

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,

    // Directory
    /// Post store root, relative to the base directory
    pub posts_dir: String,
    /// Optional directory served under /static
    pub static_dir: Option<String>,

    // Admin
    /// Artificial delay before a submitted form is processed
    pub submit_delay_ms: u64,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "mdblog".to_string(),

            posts_dir: "posts".to_string(),
            static_dir: None,

            submit_delay_ms: 0,

            highlight: HighlightConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        // An empty file deserializes as null rather than a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}
