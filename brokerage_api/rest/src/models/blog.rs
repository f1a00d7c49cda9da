use brokerage_models::blog::{BlogPost, BlogPostPage, BlogPostSlug, BlogPostSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBlogPostSummary {
    pub title: String,
    pub slug: BlogPostSlug,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<BlogPostSummary> for ApiBlogPostSummary {
    fn from(value: BlogPostSummary) -> Self {
        Self {
            title: value.title,
            slug: value.slug,
            author: value.author,
            published_at: value.published_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBlogPost {
    pub title: String,
    pub slug: BlogPostSlug,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    /// Portable text blocks as delivered by the cms
    pub body: serde_json::Value,
}

impl From<BlogPost> for ApiBlogPost {
    fn from(value: BlogPost) -> Self {
        Self {
            title: value.title,
            slug: value.slug,
            author: value.author,
            published_at: value.published_at,
            body: value.body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiBlogPostPage {
    pub post: ApiBlogPost,
    pub previous: Option<ApiBlogPostSummary>,
    pub next: Option<ApiBlogPostSummary>,
}

impl From<BlogPostPage> for ApiBlogPostPage {
    fn from(value: BlogPostPage) -> Self {
        Self {
            post: value.post.into(),
            previous: value.previous.map(Into::into),
            next: value.next.map(Into::into),
        }
    }
}
