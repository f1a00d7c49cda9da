use brokerage_core_blog_contracts::BlogFeatureService;
use brokerage_extern_contracts::cms::CmsApiService;
use brokerage_models::blog::{BlogPostPage, BlogPostSlug, BlogPostSummary};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BlogFeatureServiceImpl<CmsApi> {
    pub cms_api: CmsApi,
}

impl<CmsApi> BlogFeatureService for BlogFeatureServiceImpl<CmsApi>
where
    CmsApi: CmsApiService,
{
    async fn list_posts(&self) -> anyhow::Result<Vec<BlogPostSummary>> {
        self.cms_api.list_posts().await
    }

    async fn get_post(&self, slug: &str) -> anyhow::Result<Option<BlogPostPage>> {
        let Ok(slug) = BlogPostSlug::try_new(slug.to_owned()) else {
            return Ok(None);
        };

        let listing = self.cms_api.list_posts().await?;
        let position = listing.iter().position(|post| post.slug.matches(&slug));

        // Fetch the post under the slug it is listed with, so that a request
        // with different capitalization still finds it.
        let canonical = position.map_or(&slug, |idx| &listing[idx].slug);
        let Some(post) = self.cms_api.get_post(canonical).await? else {
            debug!(%slug, "blog post not found");
            return Ok(None);
        };

        let (previous, next) = match position {
            Some(idx) => (
                idx.checked_sub(1).and_then(|i| listing.get(i)).cloned(),
                listing.get(idx + 1).cloned(),
            ),
            None => (None, None),
        };

        Ok(Some(BlogPostPage {
            post,
            previous,
            next,
        }))
    }
}
