//! Translation of invocation outcomes into HTTP responses.
//!
//! # Responsibilities
//! - Parse the structured Sync result (status, headers, body/bodyBase64)
//! - Map every `GatewayError` variant to its status and body
//!
//! # Design Decisions
//! - A missing status code defaults to 200
//! - `bodyBase64` wins over `body` when both are present
//! - Result headers that fail header validation are skipped with a warning,
//!   the rest of the response still goes out

use std::collections::BTreeMap;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::GatewayError;
use crate::invoke::Dispatched;

/// Structured result a Sync invocation is expected to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub body_base64: Option<String>,
}

/// Turn a dispatch outcome into the client response.
pub fn into_response(outcome: Result<Dispatched, GatewayError>) -> Response {
    match outcome {
        Ok(Dispatched::Accepted) => StatusCode::OK.into_response(),
        Ok(Dispatched::Payload(payload)) => match sync_response(&payload) {
            Ok(response) => response,
            Err(e) => error_response(&e),
        },
        Err(e) => error_response(&e),
    }
}

/// Map a gateway error to its HTTP status and diagnostic body.
pub fn error_response(error: &GatewayError) -> Response {
    let status = error.status();
    let body = match error {
        GatewayError::RouteNotFound => String::new(),
        GatewayError::Invocation {
            log_excerpt: Some(excerpt),
        } => excerpt.clone(),
        other => other.to_string(),
    };
    (status, body).into_response()
}

fn sync_response(payload: &[u8]) -> Result<Response, GatewayError> {
    let result: InvocationResult = serde_json::from_slice(payload)
        .map_err(|e| GatewayError::MalformedResult(e.to_string()))?;

    let status = StatusCode::from_u16(result.status_code.unwrap_or(200))
        .map_err(|e| GatewayError::MalformedResult(e.to_string()))?;

    let body = match (&result.body_base64, &result.body) {
        (Some(encoded), _) => BASE64
            .decode(encoded)
            .map_err(|e| GatewayError::MalformedResult(format!("invalid base64 body: {e}")))?,
        (None, Some(text)) => text.clone().into_bytes(),
        (None, None) => Vec::new(),
    };

    let mut response = (status, body).into_response();
    for (name, value) in &result.headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => {
                tracing::warn!(header = %name, "skipping invalid header from function result");
            }
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn accepted_is_200_empty() {
        let response = into_response(Ok(Dispatched::Accepted));
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn sync_result_defaults_to_200() {
        let payload = br#"{"body": "hello"}"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"hello");
    }

    #[tokio::test]
    async fn sync_result_carries_status_and_headers() {
        let payload = br#"{
            "statusCode": 201,
            "headers": {"x-custom": "yes", "content-type": "text/plain"},
            "body": "created"
        }"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-custom"], "yes");
        assert_eq!(response.headers()["content-type"], "text/plain");
        assert_eq!(body_of(response).await, b"created");
    }

    #[tokio::test]
    async fn body_base64_is_decoded() {
        let payload = br#"{"bodyBase64": "SGVsbG8="}"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, b"Hello");
    }

    #[tokio::test]
    async fn unparsable_payload_is_500() {
        let response = into_response(Ok(Dispatched::Payload(b"not json".to_vec())));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = String::from_utf8(body_of(response).await).unwrap();
        assert!(body.contains("could not interpret function result"));
    }

    #[tokio::test]
    async fn invalid_base64_is_500() {
        let payload = br#"{"bodyBase64": "!!not-base64!!"}"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn out_of_range_status_is_500() {
        let payload = br#"{"statusCode": 99}"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_result_header_is_skipped() {
        let payload = br#"{"headers": {"bad header name": "v", "x-good": "v"}, "body": "ok"}"#;
        let response = into_response(Ok(Dispatched::Payload(payload.to_vec())));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-good"], "v");
        assert!(!response.headers().contains_key("bad header name"));
    }

    #[tokio::test]
    async fn not_found_is_404_empty() {
        let response = into_response(Err(GatewayError::RouteNotFound));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn invocation_error_body_is_the_log_excerpt() {
        let response = into_response(Err(GatewayError::Invocation {
            log_excerpt: Some("boom at line 3".to_string()),
        }));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, b"boom at line 3");
    }

    #[tokio::test]
    async fn invocation_error_without_excerpt_is_generic() {
        let response = into_response(Err(GatewayError::Invocation { log_excerpt: None }));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await, b"function execution failed");
    }
}
