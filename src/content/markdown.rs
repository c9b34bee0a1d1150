//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Turns a markdown body into HTML
pub trait RenderMarkdown: Send + Sync {
    /// Render markdown to HTML. Must be deterministic for a given input.
    fn render(&self, markdown: &str) -> Result<String>;
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Create from the `highlight` section of the site config
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.line_number)
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // YAML metadata blocks stay off, front-matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(
                            // Info strings like "rust,ignore" only name the language first
                            lang.split(|c: char| c == ',' || c.is_whitespace())
                                .next()
                                .unwrap_or_default()
                                .to_string(),
                        ),
                        _ => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let Some(theme) = theme else {
            return plain_code_block(code, lang);
        };

        match self.highlight_lines(code, syntax, theme) {
            Ok(lines) if self.line_numbers => add_line_numbers(&lines, lang),
            Ok(lines) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                lines.join("\n")
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed, using plain block: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Highlighted HTML for each source line, without the trailing newline
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<String>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            let regions: Vec<_> = regions
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                .filter(|(_, text)| !text.is_empty())
                .collect();
            lines.push(styled_line_to_highlighted_html(
                &regions,
                IncludeBackground::No,
            )?);
        }

        Ok(lines)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderMarkdown for MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String> {
        MarkdownRenderer::render(self, markdown)
    }
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        html_escape(lang),
        html_escape(code)
    )
}

/// Lay highlighted lines out next to a line-number gutter
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code_lines = lines.join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        code_lines
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_heading_exact() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.render("# Hello").unwrap(), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.starts_with(r#"<figure class="highlight rust"><table><tr><td class="gutter"><pre><span class="line-number">1</span></pre>"#));
        assert_eq!(html.matches(r#"class="line-number""#).count(), 1);
        assert_eq!(html.matches("<pre").count(), 2);
        assert!(html.contains("main"));
    }

    #[test]
    fn test_gutter_matches_line_count() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```rust\nfn main() {\n    let x = 1;\n\n    println!(\"{x}\");\n}\n```")
            .unwrap();
        assert_eq!(html.matches(r#"class="line-number""#).count(), 5);
        assert!(html.contains(r#"<span class="line-number">5</span></pre>"#));
        assert!(!html.contains(r#"<span class="line-number">6</span>"#));
        assert_eq!(html.matches("<pre").count(), 2);
    }

    #[test]
    fn test_render_code_block_without_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let html = renderer.render("```\nlet x = 1;\n```").unwrap();
        assert!(html.contains(r#"<pre><code class="language-text">"#));
        assert!(!html.contains("line-number"));
        assert_eq!(html.matches("<pre").count(), 1);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let renderer = MarkdownRenderer::with_options("no-such-theme", true);
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let md = "Some *text*\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n```js\nlet a = 1;\n```\n";
        assert_eq!(renderer.render(md).unwrap(), renderer.render(md).unwrap());
    }
}
