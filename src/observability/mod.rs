//! Observability: structured logging lives with `tracing` (initialized in
//! `main`), request metrics here.

pub mod metrics;
