//! Network module with deferred startup lifecycle.
//!
//! `new()` builds the response writer, `start()` binds the TCP listener and
//! `serve()` accepts connections until the shutdown future resolves. Binding
//! separately lets callers learn the OS-assigned port before serving.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use courier_core::SerializerRegistry;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{
    echo_handler, health_handler, hello_handler, liveness_handler, AppState,
};
use super::middleware::with_http_layers;
use crate::response::ResponseWriter;

/// Owns the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    writer: ResponseWriter,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, registry: Arc<SerializerRegistry>) -> Self {
        Self {
            config,
            listener: None,
            writer: ResponseWriter::new(registry),
        }
    }

    /// The writer every route renders through.
    #[must_use]
    pub fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health` -- negotiated health report
    /// - `GET /health/live` -- empty 200
    /// - `GET /hello` -- plain text
    /// - `POST /echo` -- JSON in, negotiated echo out
    pub fn build_router(&self) -> Router {
        let state = AppState {
            writer: self.writer.clone(),
            start_time: Instant::now(),
        };

        let routes = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/hello", get(hello_handler))
            .route("/echo", post(echo_handler));

        with_http_layers(routes, &self.config).with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then lets in-flight
    /// requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first, or if the server
    /// hits a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .take()
            .context("start() must be called before serve()")?;

        info!(
            media_types = ?self.writer.negotiator().registry().media_types(),
            "serving HTTP"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped");
        Ok(())
    }
}
