//! Post form submissions and their presence checks

use serde::Deserialize;

use crate::content::Post;

/// Slug taken by the `/admin/new` route, so its post could never be edited
pub const RESERVED_SLUG: &str = "new";

/// Fields submitted by the create and edit forms
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub markdown: String,
    /// Slug the post was loaded under, sent back as a hidden field
    #[serde(rename = "oldSlug")]
    pub old_slug: Option<String>,
}

/// Which required fields were left empty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: bool,
    pub slug: bool,
    pub markdown: bool,
    /// Slug collides with an admin route
    pub reserved_slug: bool,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        !(self.title || self.slug || self.markdown || self.reserved_slug)
    }
}

impl PostForm {
    /// Prefill a form from a stored post
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            markdown: post.markdown.clone(),
            old_slug: Some(post.slug.clone()),
        }
    }

    /// Check that every required field is present
    pub fn validate(&self) -> Result<Post, FormErrors> {
        let errors = FormErrors {
            title: self.title.is_empty(),
            slug: self.slug.is_empty(),
            markdown: self.markdown.is_empty(),
            reserved_slug: self.slug == RESERVED_SLUG,
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Post::new(&self.slug, &self.title, &self.markdown))
    }

    /// The slug to move from: the hidden field when sent, else `fallback`
    pub fn old_slug_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.old_slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_complete_form() {
        let form = PostForm {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            markdown: "# Hi".to_string(),
            old_slug: None,
        };
        assert_eq!(form.validate(), Ok(Post::new("hello", "Hello", "# Hi")));
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let form = PostForm {
            slug: "only-slug".to_string(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(FormErrors {
                title: true,
                slug: false,
                markdown: true,
                reserved_slug: false,
            })
        );

        let errors = PostForm::default().validate().unwrap_err();
        assert!(errors.title && errors.slug && errors.markdown);
    }

    #[test]
    fn test_deserialize_field_names() {
        let form: PostForm =
            serde_json::from_str(r#"{"title":"T","slug":"s","markdown":"m","oldSlug":"old"}"#)
                .unwrap();
        assert_eq!(form.old_slug.as_deref(), Some("old"));
        assert_eq!(form.old_slug_or("route"), "old");

        let form: PostForm = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(form.slug, "");
        assert_eq!(form.old_slug_or("route"), "route");
    }

    #[test]
    fn test_validate_rejects_reserved_slug() {
        let form = PostForm {
            title: "New".to_string(),
            slug: "new".to_string(),
            markdown: "body".to_string(),
            old_slug: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.reserved_slug);
        assert!(!errors.slug);

        let form = PostForm {
            slug: "new-things".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_from_post() {
        let form = PostForm::from_post(&Post::new("a", "A", "body"));
        assert_eq!(form.old_slug.as_deref(), Some("a"));
        assert_eq!(form.validate(), Ok(Post::new("a", "A", "body")));
    }
}
