//! Server Implementation
//!
//! HTTP 服务器启动和管理

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerError, ServerState};

/// 同时处理的最大请求数
const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Build the full router with state and middleware
pub fn build_router(state: ServerState) -> Router {
    crate::api::build_app()
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };

        let mut tasks = BackgroundTasks::new();
        state.start_background_tasks(&mut tasks);
        tasks.log_summary();

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!("🍳 Kitchen Queue Server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let served = axum::serve(listener, build_router(state.clone()))
            .with_graceful_shutdown(shutdown)
            .await;

        let failed = tasks.check_health();
        if failed > 0 {
            tracing::warn!(failed, "Background tasks ended before shutdown");
        }

        // Pending schedules die with the process; cancel them explicitly
        state.orders.shutdown();
        tasks.shutdown(self.config.shutdown_timeout()).await;

        served.map_err(|e| ServerError::Internal(e.into()))
    }
}
