//! Dispatch of invocation envelopes to the backend invoker.
//!
//! # Responsibilities
//! - Branch on the route's invocation mode
//! - Surface backend-reported execution failures with their log excerpt
//! - Apply the optional invocation timeout
//!
//! # Design Decisions
//! - No retries: invocation failures propagate to the caller as-is
//! - `DryRun` never reaches the invoker; it validates routing only
//! - The timeout is opt-in; unset means an unbounded wait

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{GatewayError, InvokeError};
use crate::invoke::envelope::InvocationEnvelope;
use crate::routes::InvocationMode;

/// Raw result of one invoker call, before translation.
#[derive(Debug, Clone, Default)]
pub struct RawInvocation {
    /// Error category reported by the backend, if the function failed.
    pub function_error: Option<String>,
    /// Decoded execution log excerpt, when log capture was requested.
    pub log_excerpt: Option<String>,
    /// Result payload bytes (Sync mode only carries meaningful content).
    pub payload: Vec<u8>,
}

/// The remote function-execution service.
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn invoke(&self, envelope: &InvocationEnvelope) -> Result<RawInvocation, InvokeError>;
}

/// Outcome of a successful dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// Sync invocation: the raw result payload, still to be translated.
    Payload(Vec<u8>),
    /// Async or DryRun: accepted, nothing to translate.
    Accepted,
}

pub struct Dispatcher {
    invoker: Arc<dyn FunctionInvoker>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, timeout: Option<Duration>) -> Self {
        Self { invoker, timeout }
    }

    /// Send the envelope per its invocation mode.
    pub async fn dispatch(&self, envelope: &InvocationEnvelope) -> Result<Dispatched, GatewayError> {
        match &envelope.mode {
            InvocationMode::DryRun => Ok(Dispatched::Accepted),
            InvocationMode::Unknown(mode) => {
                Err(GatewayError::UnsupportedInvocationMode(mode.clone()))
            }
            InvocationMode::Async => {
                self.call(envelope).await?;
                Ok(Dispatched::Accepted)
            }
            InvocationMode::Sync => {
                let raw = self.call(envelope).await?;
                if let Some(function_error) = raw.function_error {
                    tracing::warn!(
                        target_fn = %envelope.target,
                        function_error = %function_error,
                        "backend reported execution failure"
                    );
                    return Err(GatewayError::Invocation {
                        log_excerpt: raw.log_excerpt,
                    });
                }
                Ok(Dispatched::Payload(raw.payload))
            }
        }
    }

    async fn call(&self, envelope: &InvocationEnvelope) -> Result<RawInvocation, InvokeError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.invoker.invoke(envelope))
                .await
                .map_err(|_| InvokeError::Timeout(limit.as_secs()))?,
            None => self.invoker.invoke(envelope).await,
        }
    }
}
