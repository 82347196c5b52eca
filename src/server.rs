// ABOUTME: HTTP server assembly and lifecycle for the GoodRunss API
// ABOUTME: Merges every route group, applies middleware layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GoodRunss

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::middleware::{setup_cors, trace_layer, GenerateRequestId};
use crate::resources::ServerResources;
#[cfg(feature = "openapi")]
use crate::routes::OpenApiRoutes;
use crate::routes::{
    AchievementRoutes, CalendarRoutes, GmailRoutes, HealthRoutes, InstagramRoutes,
    IntegrationRoutes, MapsRoutes, MarketplaceRoutes, PaymentRoutes, SmsRoutes, WearableRoutes,
    ZoomRoutes,
};

/// Upper bound on the time spent handling one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the complete application router
///
/// Layers from outermost to innermost: request id assignment, request id
/// propagation to the response, tracing span, timeout, CORS.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let router = Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(IntegrationRoutes::routes(Arc::clone(&resources)))
        .merge(MarketplaceRoutes::routes(Arc::clone(&resources)))
        .merge(PaymentRoutes::routes(Arc::clone(&resources)))
        .merge(AchievementRoutes::routes(Arc::clone(&resources)))
        .merge(WearableRoutes::routes(Arc::clone(&resources)))
        .merge(GmailRoutes::routes(Arc::clone(&resources)))
        .merge(CalendarRoutes::routes(Arc::clone(&resources)))
        .merge(SmsRoutes::routes(Arc::clone(&resources)))
        .merge(InstagramRoutes::routes(Arc::clone(&resources)))
        .merge(MapsRoutes::routes(Arc::clone(&resources)))
        .merge(ZoomRoutes::routes(Arc::clone(&resources)));

    #[cfg(feature = "openapi")]
    let router = router.merge(OpenApiRoutes::routes());

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(GenerateRequestId))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(trace_layer())
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(setup_cors(&resources.config.cors)),
    )
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(resources: Arc<ServerResources>, addr: SocketAddr) -> Result<()> {
    let app = build_router(resources);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("GoodRunss API listening on http://{addr}");
    info!("API documentation available at http://{addr}/docs");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
