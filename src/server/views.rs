//! HTML pages served by the blog

use super::forms::{FormErrors, PostForm, RESERVED_SLUG};
use crate::content::{ParsedPost, PostSummary};
use crate::helpers::{admin_post_url, html_escape, link_to, post_url};

/// Stylesheet inlined into every page
const STYLE: &str = r#"
<style>
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; line-height: 1.6; }
nav a { margin-right: 1rem; }
label em, p em { color: #b00020; font-style: normal; margin-left: .5rem; }
input[type=text], textarea { width: 100%; box-sizing: border-box; font: inherit; }
textarea { font-family: ui-monospace, monospace; }
figure.highlight table { border-collapse: collapse; }
figure.highlight .gutter { color: #888; padding-right: .75rem; text-align: right; user-select: none; }
</style>
"#;

/// Which form page is being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode<'a> {
    Create,
    Edit { slug: &'a str },
}

impl FormMode<'_> {
    fn action(&self) -> String {
        match self {
            FormMode::Create => "/admin/new".to_string(),
            FormMode::Edit { slug } => admin_post_url(slug),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            FormMode::Create => "New Post",
            FormMode::Edit { .. } => "Edit Post",
        }
    }

    fn button(&self) -> &'static str {
        match self {
            FormMode::Create => "Create Post",
            FormMode::Edit { .. } => "Save Post",
        }
    }
}

/// Wrap page content in the site layout
pub fn layout(site_title: &str, page_title: &str, content: &str) -> String {
    let title = if page_title.is_empty() {
        html_escape(site_title)
    } else {
        format!("{} | {}", html_escape(page_title), html_escape(site_title))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>{STYLE}</head>
<body>
<nav>{} {}</nav>
<main>
{content}
</main>
</body>
</html>
"#,
        link_to("/posts", "Posts"),
        link_to("/admin", "Admin"),
    )
}

/// Public list of posts
pub fn posts_index(site_title: &str, posts: &[PostSummary]) -> String {
    let content = format!("<h1>Posts</h1>\n{}", post_list(posts, post_url));
    layout(site_title, "Posts", &content)
}

/// A single rendered post
pub fn post_page(site_title: &str, post: &ParsedPost) -> String {
    let content = format!(
        "<article>\n<h1>{}</h1>\n{}</article>",
        html_escape(&post.title),
        post.html
    );
    layout(site_title, &post.title, &content)
}

/// Admin list with edit links
pub fn admin_index(site_title: &str, posts: &[PostSummary]) -> String {
    let content = format!(
        "<h1>Admin</h1>\n<p>{}</p>\n{}",
        link_to("/admin/new", "Create a New Post"),
        post_list(posts, admin_post_url)
    );
    layout(site_title, "Admin", &content)
}

/// Create or edit form, with a message next to each missing field
pub fn post_form(
    site_title: &str,
    mode: FormMode<'_>,
    form: &PostForm,
    errors: &FormErrors,
) -> String {
    let old_slug = match mode {
        FormMode::Create => String::new(),
        FormMode::Edit { slug } => format!(
            r#"<input type="hidden" name="oldSlug" value="{}">
"#,
            html_escape(form.old_slug_or(slug))
        ),
    };

    let content = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
{old_slug}<p>
<label>Post Title:{title_error} <input type="text" name="title" value="{title}"></label>
</p>
<p>
<label>Post Slug:{slug_error} <input type="text" name="slug" value="{slug}"></label>
</p>
<p>
<label for="markdown">Markdown:</label>{markdown_error}<br>
<textarea rows="20" name="markdown" id="markdown">
{markdown}</textarea>
</p>
<p><button type="submit">{button}</button></p>
</form>"#,
        heading = mode.heading(),
        action = html_escape(&mode.action()),
        title_error = field_error(errors.title, "Title is required"),
        title = html_escape(&form.title),
        slug_error = slug_error(errors),
        slug = html_escape(&form.slug),
        markdown_error = field_error(errors.markdown, "Markdown is required"),
        markdown = html_escape(&form.markdown),
        button = mode.button(),
    );
    layout(site_title, mode.heading(), &content)
}

/// Page shown for failed requests
pub fn error_page(site_title: &str, heading: &str, message: &str) -> String {
    let content = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        html_escape(heading),
        html_escape(message)
    );
    layout(site_title, heading, &content)
}

fn post_list(posts: &[PostSummary], href: fn(&str) -> String) -> String {
    if posts.is_empty() {
        return "<p>No posts yet.</p>".to_string();
    }

    let items: String = posts
        .iter()
        .map(|post| format!("<li>{}</li>\n", link_to(&href(&post.slug), &post.title)))
        .collect();
    format!("<ul>\n{}</ul>", items)
}

fn slug_error(errors: &FormErrors) -> String {
    if errors.reserved_slug {
        field_error(true, &format!("Slug \"{}\" is reserved", RESERVED_SLUG))
    } else {
        field_error(errors.slug, "Slug is required")
    }
}

fn field_error(missing: bool, message: &str) -> String {
    if missing {
        format!(" <em>{}</em>", message)
    } else {
        String::new()
    }
}
