//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::{ServerHost, Services};
use crate::core::identity::{HeaderIdentityProvider, IdentityProvider, IdentitySource};
use crate::core::query::PageLimits;
use crate::storage::Repositories;
use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

/// Builder for creating the shopfront HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_repositories(Repositories::in_memory())
///     .with_page_limits(PageLimits { default_limit: 20, max_limit: 100 })
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    repositories: Repositories,
    identity: IdentitySource,
    limits: PageLimits,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Builder over in-memory storage and header identity
    pub fn new() -> Self {
        Self {
            repositories: Repositories::in_memory(),
            identity: IdentitySource::new(HeaderIdentityProvider::default()),
            limits: PageLimits::default(),
            custom_routes: Vec::new(),
        }
    }

    pub fn with_repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = repositories;
        self
    }

    pub fn with_identity_provider(mut self, provider: impl IdentityProvider + 'static) -> Self {
        self.identity = IdentitySource::new(provider);
        self
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Add routes that don't fit the resource pattern
    ///
    /// ```ignore
    /// let admin = Router::new().route("/admin/stats", get(stats_handler));
    /// ServerBuilder::new().with_custom_routes(admin).build();
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(&self) -> ServerHost {
        ServerHost::new(
            Services::wire(self.repositories.clone()),
            self.identity.clone(),
            self.limits,
        )
    }

    /// Build the final REST router
    pub fn build(mut self) -> Router {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = self.build_host();
        RestExposure::build_router(&host, custom_routes)
    }

    /// Serve the application with graceful shutdown on SIGTERM or Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
