//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::FrontMatter;

const DEFAULT_CONFIG: &str = r#"# mdblog Configuration

# Site
title: mdblog

# Directory
posts_dir: posts
static_dir:

# Admin
submit_delay_ms: 0

# Code highlighting
highlight:
  theme: base16-ocean.dark
  line_number: true
"#;

/// Sample posts written by `init` as (slug, title, markdown)
const SAMPLE_POSTS: &[(&str, &str, &str)] = &[
    (
        "my-first-post",
        "My First Post",
        r#"# This is my first post

Isn't it great?

Edit it at [/admin/my-first-post](/admin/my-first-post).
"#,
    ),
    (
        "90s-mixtape",
        "A Mixtape I Made Just For You",
        r#"# 90s Mixtape

- I wish (Skee-Lo)
- This Is How We Do It (Montell Jordan)
- Everlong (Foo Fighters)
- Ms. Jackson (Outkast)
- Interstate Love Song (Stone Temple Pilots)
- Killing Me Softly with His Song (Fugees, Ms. Lauryn Hill)
- Just a Friend (Biz Markie)
- The Man Who Sold The World (Nirvana)
- Semi-Charmed Life (Third Eye Blind)
- ...Baby One More Time (Britney Spears)
- Better Man (Pearl Jam)
- It's All Coming Back to Me Now (Céline Dion)
- This Kiss (Faith Hill)
- Fly Away (Lenny Kravits)
- Scar Tissue (Red Hot Chili Peppers)
- Santa Monica (Everclear)
- C'mon N' Ride it (Quad City DJ's)
"#,
    ),
];

/// Initialize a new blog in the given directory
pub fn init_blog(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Config already exists: {:?}", config_path);
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let posts_dir = target_dir.join("posts");
    fs::create_dir_all(&posts_dir)?;

    for (slug, title, markdown) in SAMPLE_POSTS {
        let path = posts_dir.join(format!("{}.md", slug));
        if path.exists() {
            tracing::debug!("Keeping existing post {:?}", path);
            continue;
        }
        fs::write(&path, FrontMatter::format_post(title, markdown)?)?;
    }

    Ok(())
}
