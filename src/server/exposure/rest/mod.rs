//! REST API exposure
//!
//! Consumes a `ServerHost` and produces an Axum `Router`.

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Resource routes for every kind
    /// - Custom routes
    pub fn build_router(host: &ServerHost, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().merge(host.registry().build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
            ),
        )
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "shopfront"
        }))
    }
}
