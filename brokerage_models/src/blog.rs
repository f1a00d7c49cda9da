use chrono::{DateTime, Utc};
use nutype::nutype;

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 256),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        TryFrom,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct BlogPostSlug(String);

impl BlogPostSlug {
    /// Slugs are compared case-insensitively.
    pub fn matches(&self, other: &str) -> bool {
        self.eq_ignore_ascii_case(other.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostSummary {
    pub title: String,
    pub slug: BlogPostSlug,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub title: String,
    pub slug: BlogPostSlug,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    /// Rich text body in the content source's block format. Passed through
    /// untouched to the presentation layer.
    pub body: serde_json::Value,
}

/// A single post together with its neighbours in the listing order.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostPage {
    pub post: BlogPost,
    pub previous: Option<BlogPostSummary>,
    pub next: Option<BlogPostSummary>,
}
