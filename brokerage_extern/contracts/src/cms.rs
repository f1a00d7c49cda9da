use std::future::Future;

use brokerage_models::blog::{BlogPost, BlogPostSlug, BlogPostSummary};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CmsApiService: Send + Sync + 'static {
    /// Return all published blog posts, newest first.
    fn list_posts(&self) -> impl Future<Output = anyhow::Result<Vec<BlogPostSummary>>> + Send;

    /// Return the blog post with exactly the given slug.
    fn get_post(
        &self,
        slug: &BlogPostSlug,
    ) -> impl Future<Output = anyhow::Result<Option<BlogPost>>> + Send;
}

#[cfg(feature = "mock")]
impl MockCmsApiService {
    pub fn with_list_posts(mut self, result: Vec<BlogPostSummary>) -> Self {
        self.expect_list_posts()
            .once()
            .return_once(move || Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_get_post(mut self, slug: BlogPostSlug, result: Option<BlogPost>) -> Self {
        self.expect_get_post()
            .once()
            .with(mockall::predicate::eq(slug))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
