use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use brokerage_core_blog_contracts::BlogFeatureService;

use crate::{
    errors::{error, internal_server_error, BLOG_POST_NOT_FOUND},
    models::blog::{ApiBlogPostPage, ApiBlogPostSummary},
};

pub fn router(service: Arc<impl BlogFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/blog", routing::get(list_posts))
        .route("/api/blog/:slug", routing::get(get_post))
        .with_state(service)
}

async fn list_posts(service: State<Arc<impl BlogFeatureService>>) -> Response {
    match service.list_posts().await {
        Ok(posts) => Json(
            posts
                .into_iter()
                .map(ApiBlogPostSummary::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => internal_server_error(err),
    }
}

async fn get_post(
    service: State<Arc<impl BlogFeatureService>>,
    Path(slug): Path<String>,
) -> Response {
    match service.get_post(&slug).await {
        Ok(Some(page)) => Json(ApiBlogPostPage::from(page)).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, BLOG_POST_NOT_FOUND),
        Err(err) => internal_server_error(err),
    }
}
