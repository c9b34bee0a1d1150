//! Front-matter parsing

use serde::{Deserialize, Serialize};

/// Line that opens and closes a front-matter block
const DELIMITER: &str = "---";

/// Front-matter data from a post file
///
/// Only `title` is recognized. Other keys are accepted and dropped, so they do
/// not survive a rewrite of the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    ///
    /// Content without a complete `---` block yields the default front-matter
    /// and the whole content as body.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = strip_line(content, DELIMITER) else {
            return Ok((FrontMatter::default(), content));
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == DELIMITER {
                let yaml_content = &rest[..offset];
                let body = strip_blank_line(&rest[offset + line.len()..]);

                if yaml_content.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }

                let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        // No closing ---, treat as no front-matter
        Ok((FrontMatter::default(), content))
    }

    /// Build the on-disk text of a post: a `title` header, a blank line, then
    /// the markdown body
    pub fn format_post(title: &str, body: &str) -> Result<String, serde_yaml::Error> {
        let header = title_line(title)?;
        Ok(format!("{DELIMITER}\n{header}\n{DELIMITER}\n\n{body}"))
    }
}

/// `title: <title>` written literally when YAML reads it back unchanged,
/// otherwise whatever quoting serde_yaml picks
fn title_line(title: &str) -> Result<String, serde_yaml::Error> {
    let literal = format!("title: {title}");
    if let Ok(fm) = serde_yaml::from_str::<FrontMatter>(&literal) {
        if fm.title.as_deref() == Some(title) {
            return Ok(literal);
        }
    }

    let quoted = serde_yaml::to_string(&FrontMatter {
        title: Some(title.to_string()),
    })?;
    Ok(quoted.trim_end().to_string())
}

/// Strip a line consisting of exactly `expected`, returning what follows it
fn strip_line<'a>(content: &'a str, expected: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(expected)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Drop the single blank line that separates the header from the body
fn strip_blank_line(body: &str) -> &str {
    body.strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body)
}
