//! Backend invocation subsystem.
//!
//! # Data Flow
//! ```text
//! matched request
//!     → envelope.rs (build JSON payload, enforce body limit)
//!     → dispatcher.rs (mode branching, optional timeout)
//!     → http_invoker.rs (REST call to the execution service)
//! ```

pub mod dispatcher;
pub mod envelope;
pub mod http_invoker;

pub use dispatcher::{Dispatched, Dispatcher, FunctionInvoker, RawInvocation};
pub use envelope::{EnvelopeBuilder, InvocationEnvelope};
pub use http_invoker::HttpInvoker;
