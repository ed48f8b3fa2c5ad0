//! Accept loop and process lifecycle.

use std::future::Future;
use std::io;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use snip_lib::Evaluator;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::assets::AssetTable;
use crate::config::ServerConfig;
use crate::envelope::{Request, ResponseEnvelope};
use crate::router::{CODE_ROUTE, Router};

struct AppState {
    router: Router,
    max_body: usize,
}

pub struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    /// Standard routes backed by a fresh evaluator and the embedded web UI.
    pub fn new(config: ServerConfig) -> Self {
        let evaluator = Arc::new(Evaluator::new(config.evaluator));
        let router = Router::standard(evaluator, Arc::new(AssetTable::embedded()));
        Self::with_router(config, router)
    }

    pub fn with_router(config: ServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves until Ctrl-C or SIGTERM.
    pub async fn run(self) -> io::Result<()> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on `listener` until `shutdown` resolves. In-flight requests
    /// are allowed to finish.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!("snippet evaluator started at http://{local}/{CODE_ROUTE}/");
        info!("web interface at http://{local}/");

        let state = Arc::new(AppState {
            router: self.router,
            max_body: self.config.max_body,
        });
        let app = axum::Router::new().fallback(handle).with_state(state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("server stopped");
        Ok(())
    }
}

async fn handle(
    State(state): State<Arc<AppState>>,
    request: axum::extract::Request,
) -> ResponseEnvelope {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body).await {
        Ok(body) => body,
        Err(err) => {
            warn!(path = %parts.uri.path(), error = %err, "failed to read request body");
            return ResponseEnvelope::error(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("failed to read request body: {err}"),
            );
        }
    };

    let request = Request::new(parts.method, parts.uri.path(), body);
    state.router.route(request).await
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
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
    info!("shutdown requested, finishing in-flight requests");
}
