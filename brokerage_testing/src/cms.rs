use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing, Json, Router,
};
use brokerage_models::blog::BlogPost;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

pub const API_VERSION: &str = "2025-05-03";
pub const DATASET: &str = "production";

/// A blog post document as the content source stores it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmsDocument {
    pub title: String,
    pub slug: String,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub body: Value,
}

pub fn demo_documents() -> Vec<CmsDocument> {
    brokerage_demo::blog::ALL_POSTS
        .iter()
        .map(|post| CmsDocument::from(&**post))
        .collect()
}

impl From<&BlogPost> for CmsDocument {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone().into_inner(),
            author: post.author.clone(),
            published_at: post
                .published_at
                .map(|x| x.to_rfc3339_opts(SecondsFormat::Secs, true)),
            body: post.body.clone(),
        }
    }
}

pub fn router(documents: Vec<CmsDocument>) -> Router<()> {
    Router::new()
        .route("/:version/data/query/:dataset", routing::get(query))
        .with_state(Arc::new(documents))
}

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting cms testing server on {host}:{port}");
    info!("Query endpoint: http://{host}:{port}/v{API_VERSION}/data/query/{DATASET}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(demo_documents()))
        .await
        .context("Failed to start HTTP server")
}

/// Start the cms testing server with the given documents on an ephemeral
/// port of the loopback interface.
pub async fn spawn(documents: Vec<CmsDocument>) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .context("Failed to bind cms testing server")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move { axum::serve(listener, router(documents)).await });
    Ok(addr)
}

async fn query(
    documents: State<Arc<Vec<CmsDocument>>>,
    Path((version, dataset)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if version != format!("v{API_VERSION}") || dataset != DATASET {
        return Err(StatusCode::NOT_FOUND);
    }
    if !params.contains_key("query") {
        return Err(StatusCode::BAD_REQUEST);
    }

    let result = match params.get("$slug") {
        Some(slug) => {
            let slug = serde_json::from_str::<String>(slug).map_err(|_| StatusCode::BAD_REQUEST)?;
            documents
                .iter()
                .find(|doc| doc.slug == slug)
                .map(|doc| json!(doc))
                .unwrap_or(Value::Null)
        }
        None => {
            let mut listing = documents.iter().collect::<Vec<_>>();
            listing.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            listing
                .into_iter()
                .map(|doc| {
                    json!({
                        "title": doc.title,
                        "slug": doc.slug,
                        "author": doc.author,
                        "publishedAt": doc.published_at,
                    })
                })
                .collect()
        }
    };

    Ok(Json(json!({ "ms": 1, "result": result })))
}
