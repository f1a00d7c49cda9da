use std::time::Duration;

use brokerage_demo::blog::{summary, ALL_POSTS, PRICES};
use brokerage_extern_contracts::cms::CmsApiService;
use brokerage_extern_impl::{
    cms::{CmsApiServiceConfig, CmsApiServiceImpl},
    http::HttpClient,
};
use brokerage_testing::cms::{demo_documents, spawn, API_VERSION, DATASET};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn list_posts() {
    let sut = make_sut().await;

    let result = sut.list_posts().await.unwrap();

    let expected = ALL_POSTS.iter().map(|post| summary(post)).collect::<Vec<_>>();
    assert_eq!(result, expected);
}

#[tokio::test]
async fn get_post() {
    let sut = make_sut().await;

    let result = sut.get_post(&PRICES.slug).await.unwrap();

    assert_eq!(result.as_ref(), Some(&*PRICES));
}

#[tokio::test]
async fn get_post_not_found() {
    let sut = make_sut().await;

    let result = sut
        .get_post(&"does-not-exist".to_owned().try_into().unwrap())
        .await
        .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn unreachable() {
    let config = CmsApiServiceConfig::new(
        "test",
        DATASET,
        API_VERSION,
        false,
        Some("http://127.0.0.1:1".parse().unwrap()),
    )
    .unwrap();
    let sut = CmsApiServiceImpl::new(HttpClient::new(Duration::from_secs(5)).unwrap(), config);

    let result = sut.list_posts().await;

    assert!(result.is_err());
}

async fn make_sut() -> CmsApiServiceImpl {
    let addr = spawn(demo_documents()).await.unwrap();
    let config = CmsApiServiceConfig::new(
        "test",
        DATASET,
        API_VERSION,
        true,
        Some(format!("http://{addr}").parse().unwrap()),
    )
    .unwrap();

    CmsApiServiceImpl::new(HttpClient::new(Duration::from_secs(5)).unwrap(), config)
}
