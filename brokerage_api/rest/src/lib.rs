use std::net::SocketAddr;

use axum::Router;
use brokerage_core_blog_contracts::BlogFeatureService;
use brokerage_core_health_contracts::HealthFeatureService;
use brokerage_core_submission_contracts::SubmissionFeatureService;
use tokio::net::TcpListener;
use tracing::info;

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Submission, Blog> {
    pub health: Health,
    pub submission: Submission,
    pub blog: Blog,
    pub config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Include the underlying error in `500` responses of the submission
    /// endpoint.
    pub expose_error_details: bool,
}

impl<Health, Submission, Blog> RestServer<Health, Submission, Blog>
where
    Health: HealthFeatureService,
    Submission: SubmissionFeatureService,
    Blog: BlogFeatureService,
{
    /// Serve the api until the process receives `SIGINT` or `SIGTERM`.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::submission::router(
                self.submission.into(),
                self.config.expose_error_details,
            ))
            .merge(routes::blog::router(self.blog.into()))
            .fallback(routes::not_found);

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down http server");
}
