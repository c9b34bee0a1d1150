//! HTML helper functions

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("/posts/hello", "Hello & welcome") // -> <a href="/posts/hello">Hello &amp; welcome</a>
/// ```
pub fn link_to(path: &str, text: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        html_escape(path),
        html_escape(text)
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
