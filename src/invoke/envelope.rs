//! Invocation envelope construction.
//!
//! # Responsibilities
//! - Capture the inbound request (method, headers, body, url, protocol, ip)
//!   as the JSON payload sent to the backend function
//! - Attach the matched route's target, mode, log flag and qualifier
//! - Enforce the body size limit before any envelope exists
//!
//! # Design Decisions
//! - Bodies that are valid UTF-8 travel as text; anything else is base64
//!   encoded and flagged with `isBase64Encoded`, so binary uploads survive
//!   the JSON envelope
//! - Header values that are not valid UTF-8 are skipped, not rejected

use std::collections::BTreeMap;
use std::net::IpAddr;

use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::error::GatewayError;
use crate::routes::{InvocationMode, RouteMatch};

/// The JSON payload delivered to the backend function, plus the routing
/// metadata the dispatcher needs (not serialized).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEnvelope {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_base64_encoded: bool,
    pub url: String,
    pub path: String,
    pub protocol: String,
    pub ip: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub path_parameters: BTreeMap<String, String>,

    #[serde(skip)]
    pub target: String,
    #[serde(skip)]
    pub mode: InvocationMode,
    #[serde(skip)]
    pub log_capture: bool,
    #[serde(skip)]
    pub qualifier: Option<String>,
}

/// Builds envelopes under a configured body size limit.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeBuilder {
    max_body_bytes: usize,
}

impl EnvelopeBuilder {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Build the envelope for a matched request. Oversized bodies are
    /// rejected here, before anything is sent anywhere.
    pub fn build(
        &self,
        parts: &Parts,
        body: &[u8],
        client_ip: IpAddr,
        matched: &RouteMatch<'_>,
    ) -> Result<InvocationEnvelope, GatewayError> {
        if body.len() > self.max_body_bytes {
            return Err(GatewayError::BodyTooLarge {
                limit: self.max_body_bytes,
            });
        }

        let mut headers = BTreeMap::new();
        for (name, value) in parts.headers.iter() {
            match value.to_str() {
                Ok(v) => {
                    headers.insert(name.as_str().to_string(), v.to_string());
                }
                Err(_) => {
                    tracing::debug!(header = %name, "skipping non-UTF-8 header value");
                }
            }
        }

        let (body, is_base64_encoded) = if body.is_empty() {
            (None, false)
        } else {
            match std::str::from_utf8(body) {
                Ok(text) => (Some(text.to_string()), false),
                Err(_) => (Some(BASE64.encode(body)), true),
            }
        };

        let record = matched.record;
        Ok(InvocationEnvelope {
            method: parts.method.as_str().to_string(),
            headers,
            body,
            is_base64_encoded,
            url: parts.uri.to_string(),
            path: parts.uri.path().to_string(),
            protocol: format!("{:?}", parts.version),
            ip: client_ip.to_string(),
            path_parameters: matched.path_params.iter().cloned().collect(),
            target: record.target.clone(),
            mode: record.mode.clone(),
            log_capture: record.log_capture,
            qualifier: record.qualifier.clone(),
        })
    }
}
