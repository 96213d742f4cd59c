//! Route resolution subsystem.
//!
//! # Data Flow
//! ```text
//! external store (JSON table)
//!     → store.rs (filtered read of enabled records)
//!     → record.rs (compile patterns, drop invalid, sort by priority)
//!     → cache.rs (atomic snapshot swap on a fixed interval)
//!     → matcher.rs (first-match scan per request)
//! ```

pub mod cache;
pub mod matcher;
pub mod pattern;
pub mod record;
pub mod store;

pub use cache::RouteCache;
pub use matcher::{match_route, RouteMatch};
pub use record::{InvocationMode, RouteRecord, RouteSet, StoredRoute};
pub use store::{JsonFileStore, RouteStore, StoreError};
