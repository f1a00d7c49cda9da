use std::sync::LazyLock;

use brokerage_models::blog::{BlogPost, BlogPostSummary};
use chrono::{TimeZone, Utc};
use serde_json::json;

/// All posts, newest first.
pub static ALL_POSTS: LazyLock<Vec<&BlogPost>> =
    LazyLock::new(|| vec![&LEASING_VS_BUYING, &PRICES, &RIR_TRANSFER]);

pub static LEASING_VS_BUYING: LazyLock<BlogPost> = LazyLock::new(|| BlogPost {
    title: "Leasing vs. Buying IPv4 Space".into(),
    slug: "leasing-vs-buying-ipv4-space".to_owned().try_into().unwrap(),
    author: Some("IPv4 Brokerage Team".into()),
    published_at: Some(Utc.with_ymd_and_hms(2025, 4, 15, 9, 0, 0).unwrap()),
    body: body("Leasing vs. Buying IPv4 Space."),
});

pub static PRICES: LazyLock<BlogPost> = LazyLock::new(|| BlogPost {
    title: "Why IPv4 Prices Keep Rising".into(),
    slug: "why-ipv4-prices-keep-rising".to_owned().try_into().unwrap(),
    author: Some("IPv4 Brokerage Team".into()),
    published_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
    body: body("Why IPv4 Prices Keep Rising."),
});

pub static RIR_TRANSFER: LazyLock<BlogPost> = LazyLock::new(|| BlogPost {
    title: "How an RIR Transfer Works".into(),
    slug: "how-an-rir-transfer-works".to_owned().try_into().unwrap(),
    author: Some("IPv4 Brokerage Team".into()),
    published_at: Some(Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap()),
    body: body("How an RIR Transfer Works."),
});

pub fn summary(post: &BlogPost) -> BlogPostSummary {
    BlogPostSummary {
        title: post.title.clone(),
        slug: post.slug.clone(),
        author: post.author.clone(),
        published_at: post.published_at,
    }
}

fn body(text: &str) -> serde_json::Value {
    json!([{
        "_type": "block",
        "style": "normal",
        "children": [{"_type": "span", "text": text}],
    }])
}
