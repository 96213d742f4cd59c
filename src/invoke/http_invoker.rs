//! HTTP implementation of the function invoker.
//!
//! Speaks the REST invocation API of the function-execution service:
//! `POST {base}/2015-03-31/functions/{name}/invocations` with the invocation
//! type and log-capture flag in `X-Amz-*` headers and the optional qualifier
//! as a query parameter. The execution log excerpt comes back base64-encoded
//! in `X-Amz-Log-Result`; a function failure is flagged by
//! `X-Amz-Function-Error` with the error payload in the body.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Uri};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use url::Url;

use crate::error::InvokeError;
use crate::invoke::dispatcher::{FunctionInvoker, RawInvocation};
use crate::invoke::envelope::InvocationEnvelope;

/// Upper bound on a buffered result payload.
const MAX_RESULT_BYTES: usize = 16 * 1024 * 1024;

pub struct HttpInvoker {
    client: Client<HttpConnector, Body>,
    base_url: Url,
}

impl HttpInvoker {
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, base_url }
    }

    fn invocation_uri(&self, target: &str, qualifier: Option<&str>) -> Result<Uri, InvokeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| InvokeError::Transport("invoker base URL cannot be a base".to_string()))?
            .extend(["2015-03-31", "functions", target, "invocations"]);
        if let Some(qualifier) = qualifier {
            url.query_pairs_mut().append_pair("Qualifier", qualifier);
        }
        url.as_str()
            .parse()
            .map_err(|e| InvokeError::Transport(format!("invalid invocation URI: {e}")))
    }
}

#[async_trait]
impl FunctionInvoker for HttpInvoker {
    async fn invoke(&self, envelope: &InvocationEnvelope) -> Result<RawInvocation, InvokeError> {
        let payload = serde_json::to_vec(envelope)
            .map_err(|e| InvokeError::Transport(format!("envelope serialization: {e}")))?;
        let uri = self.invocation_uri(&envelope.target, envelope.qualifier.as_deref())?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-amz-invocation-type", envelope.mode.wire_name())
            .header(
                "x-amz-log-type",
                if envelope.log_capture { "Tail" } else { "None" },
            )
            .body(Body::from(payload))
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| InvokeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvokeError::Status(status.as_u16()));
        }

        let function_error = response
            .headers()
            .get("x-amz-function-error")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let log_excerpt = response
            .headers()
            .get("x-amz-log-result")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| BASE64.decode(v).ok())
            .and_then(|bytes| String::from_utf8(bytes).ok());

        let payload = axum::body::to_bytes(Body::new(response.into_body()), MAX_RESULT_BYTES)
            .await
            .map_err(|e| InvokeError::Transport(format!("reading result payload: {e}")))?
            .to_vec();

        Ok(RawInvocation {
            function_error,
            log_excerpt,
            payload,
        })
    }
}
