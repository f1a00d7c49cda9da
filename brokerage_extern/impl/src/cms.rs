use std::sync::Arc;

use anyhow::Context;
use brokerage_extern_contracts::cms::CmsApiService;
use brokerage_models::blog::{BlogPost, BlogPostSlug, BlogPostSummary};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::warn;
use url::Url;

use crate::http::HttpClient;

const LIST_POSTS_QUERY: &str = r#"*[_type == "post" && defined(slug.current)] | order(publishedAt desc) {
  title,
  "slug": slug.current,
  "author": author->name,
  publishedAt
}"#;

const GET_POST_QUERY: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  title,
  "slug": slug.current,
  "author": author->name,
  publishedAt,
  body
}"#;

#[derive(Debug, Clone)]
pub struct CmsApiServiceImpl {
    client: HttpClient,
    config: CmsApiServiceConfig,
}

#[derive(Debug, Clone)]
pub struct CmsApiServiceConfig {
    query_endpoint: Arc<Url>,
}

impl CmsApiServiceConfig {
    /// Build the query endpoint of a dataset. Without an override, the cached
    /// `apicdn.sanity.io` or the live `api.sanity.io` host of the project is
    /// used.
    pub fn new(
        project_id: &str,
        dataset: &str,
        api_version: &str,
        use_cdn: bool,
        base_url_override: Option<Url>,
    ) -> anyhow::Result<Self> {
        let base_url = match base_url_override {
            Some(url) => url,
            None => {
                let host = if use_cdn { "apicdn" } else { "api" };
                format!("https://{project_id}.{host}.sanity.io/").parse()?
            }
        };

        let query_endpoint = base_url
            .join(&format!("v{api_version}/data/query/{dataset}"))
            .context("Failed to build cms query endpoint")?;

        Ok(Self {
            query_endpoint: query_endpoint.into(),
        })
    }

    pub fn query_endpoint(&self) -> &Url {
        &self.query_endpoint
    }
}

impl CmsApiServiceImpl {
    pub fn new(client: HttpClient, config: CmsApiServiceConfig) -> Self {
        Self { client, config }
    }

    async fn query<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> anyhow::Result<T> {
        self.client
            .get((*self.config.query_endpoint).clone())
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json::<QueryResponse<T>>()
            .await
            .map(|response| response.result)
            .map_err(Into::into)
    }
}

impl CmsApiService for CmsApiServiceImpl {
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPostSummary>> {
        let posts = self
            .query::<Vec<CmsPost>>(&[("query", LIST_POSTS_QUERY)])
            .await
            .context("Failed to list blog posts")?;

        Ok(posts
            .into_iter()
            .filter_map(|post| {
                let slug = post.slug.clone();
                BlogPost::try_from(post)
                    .inspect_err(|err| warn!(%slug, "Skipping blog post: {err}"))
                    .ok()
            })
            .map(|post| BlogPostSummary {
                title: post.title,
                slug: post.slug,
                author: post.author,
                published_at: post.published_at,
            })
            .collect())
    }

    async fn get_post(&self, slug: &BlogPostSlug) -> anyhow::Result<Option<BlogPost>> {
        let slug_param = serde_json::to_string(slug.as_str())?;
        self.query::<Option<CmsPost>>(&[("query", GET_POST_QUERY), ("$slug", &slug_param)])
            .await
            .with_context(|| format!("Failed to fetch blog post {slug}"))?
            .map(BlogPost::try_from)
            .transpose()
    }
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CmsPost {
    title: Option<String>,
    slug: String,
    author: Option<String>,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    body: serde_json::Value,
}

impl TryFrom<CmsPost> for BlogPost {
    type Error = anyhow::Error;

    fn try_from(value: CmsPost) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title.unwrap_or_default(),
            slug: BlogPostSlug::try_new(value.slug).context("Invalid blog post slug")?,
            author: value.author,
            published_at: value.published_at,
            body: value.body,
        })
    }
}
