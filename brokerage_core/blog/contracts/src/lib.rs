use std::future::Future;

use brokerage_models::blog::{BlogPostPage, BlogPostSummary};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait BlogFeatureService: Send + Sync + 'static {
    /// Return all blog posts, newest first.
    fn list_posts(&self) -> impl Future<Output = anyhow::Result<Vec<BlogPostSummary>>> + Send;

    /// Return the blog post with the given slug together with its previous
    /// and next post in the listing. Slugs are matched case-insensitively.
    fn get_post(
        &self,
        slug: &str,
    ) -> impl Future<Output = anyhow::Result<Option<BlogPostPage>>> + Send;
}

#[cfg(feature = "mock")]
impl MockBlogFeatureService {
    pub fn with_list_posts(mut self, result: Vec<BlogPostSummary>) -> Self {
        self.expect_list_posts()
            .once()
            .return_once(move || Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_get_post(mut self, slug: String, result: Option<BlogPostPage>) -> Self {
        self.expect_get_post()
            .once()
            .with(mockall::predicate::eq(slug))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }
}
