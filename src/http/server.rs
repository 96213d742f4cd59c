//! HTTP server setup and per-request orchestration.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Serve the unconditional health endpoint before any route matching
//! - Run the request stages in order: snapshot read, match, body limit,
//!   envelope, dispatch, translate
//! - Record request metrics and correlation IDs
//!
//! # Design Decisions
//! - The snapshot is loaded once per request; a refresh mid-request does not
//!   change which routes that request sees
//! - Every stage either short-circuits into a response or passes an explicit
//!   value forward; no implicit control flow between stages

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::translate;
use crate::invoke::{Dispatcher, EnvelopeBuilder, FunctionInvoker};
use crate::observability::metrics;
use crate::routes::{match_route, RouteCache};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RouteCache>,
    pub dispatcher: Arc<Dispatcher>,
    pub envelopes: EnvelopeBuilder,
}

/// HTTP front of the gateway.
pub struct GatewayServer {
    router: Router,
}

impl GatewayServer {
    pub fn new(
        config: &GatewayConfig,
        cache: Arc<RouteCache>,
        invoker: Arc<dyn FunctionInvoker>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(invoker, config.invoker.timeout()));
        let state = AppState {
            cache,
            dispatcher,
            envelopes: EnvelopeBuilder::new(config.limits.max_body_bytes),
        };
        Self {
            router: Self::build_router(state),
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// Catch-all handler: health short-circuit, then match → dispatch → translate.
async fn gateway_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    // Health checks must not depend on route cache state.
    if request.method() == Method::GET && request.uri().path() == "/status" {
        return (StatusCode::OK, "OK").into_response();
    }

    let start = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "handling request"
    );

    // Pin the snapshot for this request; a concurrent refresh publishes a new
    // one without affecting us.
    let snapshot = state.cache.current();

    let Some(matched) = match_route(&snapshot, &method, host.as_deref(), &path) else {
        tracing::debug!(request_id = %request_id, path = %path, "no route matched");
        metrics::record_request(&method, 404, "none", start);
        return translate::error_response(&GatewayError::RouteNotFound);
    };
    let target = matched.record.target.clone();

    let limit = state.envelopes.max_body_bytes();
    let body_bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!(request_id = %request_id, limit, "request body over limit");
            metrics::record_request(&method, 413, &target, start);
            return translate::error_response(&GatewayError::BodyTooLarge { limit });
        }
    };

    let outcome = match state
        .envelopes
        .build(&parts, &body_bytes, addr.ip(), &matched)
    {
        Ok(envelope) => state.dispatcher.dispatch(&envelope).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        tracing::warn!(
            request_id = %request_id,
            target_fn = %target,
            error = %e,
            "request failed"
        );
    }

    let response = translate::into_response(outcome);
    metrics::record_request(&method, response.status().as_u16(), &target, start);
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
