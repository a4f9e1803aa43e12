//! Server Implementation
//!
//! HTTP 服务器启动和管理

use axum::{Router, middleware};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerError, ServerState};
use crate::middleware::logging_middleware;

/// Build the Axum application with state and all middleware applied
pub fn build_app(state: ServerState) -> Router {
    crate::api::router()
        // JWT + 会话认证 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Tower HTTP 中间件
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                port: self.config.http_port,
                source,
            })?;

        tracing::info!("Dine server listening on {}", addr);

        let tasks = self.state.start_background_tasks();
        let app = build_app(self.state.clone());
        let shutdown = self.state.shutdown.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutting down...");
                        shutdown.cancel();
                    }
                    _ = shutdown.cancelled() => {}
                }
            })
            .await
            .map_err(ServerError::Serve)?;

        tasks.shutdown().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}
