pub mod adapters;
pub mod error;
pub mod routes;
pub mod state;

use adapters::{KubeNamespaceLister, KubeResourceCatalog, KubectlRunner};
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use kubechat_core::bindings::{ConfigMerger, KubectlMerger};
use kubechat_core::builder::KubectlCmdBuilder;
use kubechat_core::config::Config;
use kubechat_core::guard::CommandGuard;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/interactions",
            post(routes::interactions::handle_interaction),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Wire the builder to the cluster: API discovery, namespace inventory and
/// the kubectl binary named in the settings.
pub async fn build_engine(config: Arc<Config>) -> anyhow::Result<KubectlCmdBuilder> {
    let client = kube::Client::try_default()
        .await
        .context("cannot create Kubernetes client")?;

    let merger: Arc<dyn KubectlMerger> = Arc::new(ConfigMerger::new(config.clone()));
    let catalog = KubeResourceCatalog::discover(client.clone()).await?;
    let executor = KubectlRunner::locate(&config.settings.kubectl_binary, merger.clone())?;

    Ok(KubectlCmdBuilder::new(
        merger,
        Arc::new(executor),
        Arc::new(KubeNamespaceLister::new(client)),
        Arc::new(CommandGuard::new(catalog)),
    ))
}

pub async fn build_state(config: Config) -> anyhow::Result<state::AppState> {
    let timeout = Duration::from_secs(config.settings.interaction_timeout_seconds);
    let cluster_name = config.settings.cluster_name.clone();
    let builder = build_engine(Arc::new(config)).await?;
    Ok(state::AppState::new(builder, timeout, cluster_name))
}

/// Start the interaction server on `port`.
pub async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(config, listener).await
}

/// Start the interaction server on a pre-bound listener.
pub async fn serve_on(config: Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(build_state(config).await?);

    tracing::info!("kubechat listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
