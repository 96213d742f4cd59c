//! Gateway error taxonomy.
//!
//! Every per-request failure maps to exactly one HTTP status; errors are
//! local to the request that raised them and never touch the route cache.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while handling a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No record in the active snapshot matched the request.
    #[error("no route matched the request")]
    RouteNotFound,

    /// Request body exceeded the configured limit; never dispatched.
    #[error("request body exceeds the configured limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The function ran but reported an execution failure.
    #[error("function execution failed")]
    Invocation { log_excerpt: Option<String> },

    /// The function result could not be parsed into the expected shape.
    #[error("could not interpret function result: {0}")]
    MalformedResult(String),

    /// Route record carries an invocation type the gateway does not know.
    /// A configuration defect: surfaced per request, never dispatched.
    #[error("route specifies unsupported invocation type `{0}`")]
    UnsupportedInvocationMode(String),

    /// The call to the invoker itself failed at the transport level.
    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl GatewayError {
    /// HTTP status this error is surfaced as.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Invocation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MalformedResult(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::UnsupportedInvocationMode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Invoke(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Transport-level failures talking to the function invoker.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("request to invoker failed: {0}")]
    Transport(String),

    #[error("invoker returned unexpected status {0}")]
    Status(u16),

    #[error("invocation timed out after {0} seconds")]
    Timeout(u64),
}
