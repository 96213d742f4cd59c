//! HTTP gateway that routes requests to named backend functions.
//!
//! Inbound requests are matched against a dynamically maintained route table
//! and dispatched to an externally hosted compute unit; the invocation result
//! is translated back into an HTTP response.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌────────────────────────────────────────────────┐
//!                     │                    GATEWAY                      │
//!   Client Request    │  ┌────────┐   ┌─────────┐   ┌──────────────┐  │
//!   ──────────────────┼─▶│  http  │──▶│ routes  │──▶│    invoke    │──┼──▶ Function
//!                     │  │ server │   │ matcher │   │  dispatcher  │  │    Invoker
//!                     │  └────────┘   └────┬────┘   └──────┬───────┘  │
//!                     │                    │               │          │
//!                     │              ┌─────┴─────┐         │          │
//!                     │              │RouteCache │         │          │
//!   Client Response   │  ┌─────────┐ │ (ArcSwap) │         │          │
//!   ◀─────────────────┼──│translate│ └─────┬─────┘         │          │
//!                     │  └─────────┘       │ refresh timer │          │
//!                     └────────────────────┼───────────────┼──────────┘
//!                                          ▼               │
//!                                     Route Store ◀────────┘
//! ```
//!
//! The route snapshot is immutable and swapped atomically on a fixed refresh
//! interval; request handlers load it lock-free and never observe a partial
//! update.

// Core subsystems
pub mod config;
pub mod http;
pub mod invoke;
pub mod routes;

// Cross-cutting concerns
pub mod error;
pub mod observability;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use routes::{RouteCache, RouteSet};
