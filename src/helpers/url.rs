//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a URL path segment
pub fn encode_url(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Public URL of a post
pub fn post_url(slug: &str) -> String {
    format!("/posts/{}", encode_url(slug))
}

/// Admin edit URL of a post
pub fn admin_post_url(slug: &str) -> String {
    format!("/admin/{}", encode_url(slug))
}
