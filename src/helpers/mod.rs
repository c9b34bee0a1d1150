//! Helper functions for page rendering

mod html;
mod url;

pub use html::*;
pub use url::*;
