//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, health short-circuit, stage ordering)
//!     → [routes subsystem matches]
//!     → [invoke subsystem dispatches]
//!     → translate.rs (result/error → status, headers, body)
//!     → Send to client
//! ```

pub mod server;
pub mod translate;

pub use server::{AppState, GatewayServer};
pub use translate::InvocationResult;
