//! Route data model.
//!
//! # Responsibilities
//! - Deserialize raw records as stored in the route table
//! - Compile them into immutable, match-ready `RouteRecord`s
//! - Build ordered `RouteSet` snapshots
//!
//! # Design Decisions
//! - Records with a pattern that fails to compile are dropped with a warning;
//!   one bad record must not take the table down
//! - Unknown invocation types survive snapshot building and fail per request,
//!   so the defect is visible on the route that carries it
//! - Sorting is stable: equal priorities keep their store read order

use serde::Deserialize;

use crate::routes::pattern::PathPattern;

/// Raw route record with the field names used by the external store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRoute {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "Enabled", default)]
    pub enabled: bool,

    /// HTTP methods to match; `*` matches any. Empty matches nothing.
    #[serde(rename = "MatchMethods", default)]
    pub match_methods: Vec<String>,

    /// Host headers to match; `*` matches any. Empty matches nothing.
    #[serde(rename = "MatchHosts", default)]
    pub match_hosts: Vec<String>,

    #[serde(rename = "MatchPath")]
    pub match_path: String,

    /// Higher priority records are tried first.
    #[serde(rename = "Priority", default)]
    pub priority: i64,

    #[serde(rename = "LambdaFunctionName")]
    pub function_name: String,

    /// `RequestResponse`, `Event` or `DryRun`.
    #[serde(rename = "LambdaInvocationType")]
    pub invocation_type: String,

    /// `Tail` requests an execution log excerpt with the result.
    #[serde(rename = "LambdaLogType", default)]
    pub log_type: Option<String>,

    /// Optional version or alias of the target function.
    #[serde(rename = "LambdaQualifier", default)]
    pub qualifier: Option<String>,
}

/// How the gateway waits on the backend function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// Wait for a structured result.
    Sync,
    /// Fire-and-forget; success once the call is accepted.
    Async,
    /// Validate routing only; the invoker is never called.
    DryRun,
    /// Unrecognized store value; fails per request at dispatch time.
    Unknown(String),
}

impl InvocationMode {
    pub fn from_store(value: &str) -> Self {
        match value {
            "RequestResponse" => InvocationMode::Sync,
            "Event" => InvocationMode::Async,
            "DryRun" => InvocationMode::DryRun,
            other => InvocationMode::Unknown(other.to_string()),
        }
    }

    /// Invocation type name on the invoker wire.
    pub fn wire_name(&self) -> &str {
        match self {
            InvocationMode::Sync => "RequestResponse",
            InvocationMode::Async => "Event",
            InvocationMode::DryRun => "DryRun",
            InvocationMode::Unknown(other) => other,
        }
    }
}

/// A method or host match list: an explicit set or the `*` wildcard.
#[derive(Debug, Clone)]
pub enum NameSet {
    Any,
    Listed(Vec<String>),
}

impl NameSet {
    /// `normalize` folds entries to lowercase (hosts are case-insensitive).
    fn from_values(values: &[String], normalize: bool) -> Self {
        if values.iter().any(|v| v == "*") {
            return NameSet::Any;
        }
        let listed = values
            .iter()
            .map(|v| {
                if normalize {
                    v.to_ascii_lowercase()
                } else {
                    v.clone()
                }
            })
            .collect();
        NameSet::Listed(listed)
    }

    pub fn contains(&self, name: &str) -> bool {
        match self {
            NameSet::Any => true,
            NameSet::Listed(values) => values.iter().any(|v| v == name),
        }
    }
}

/// One compiled routing rule.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub id: String,
    pub methods: NameSet,
    pub hosts: NameSet,
    pub path: PathPattern,
    pub priority: i64,
    pub target: String,
    pub mode: InvocationMode,
    pub log_capture: bool,
    pub qualifier: Option<String>,
}

impl RouteRecord {
    fn from_stored(stored: StoredRoute) -> Result<Self, crate::routes::pattern::PatternError> {
        let path = PathPattern::compile(&stored.match_path)?;
        Ok(Self {
            id: stored.id,
            methods: NameSet::from_values(&stored.match_methods, false),
            hosts: NameSet::from_values(&stored.match_hosts, true),
            path,
            priority: stored.priority,
            target: stored.function_name,
            mode: InvocationMode::from_store(&stored.invocation_type),
            log_capture: stored.log_type.as_deref() == Some("Tail"),
            qualifier: stored.qualifier,
        })
    }
}

/// An immutable, priority-ordered snapshot of enabled routes.
///
/// Built once per refresh cycle and shared read-only; never mutated in place.
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Vec<RouteRecord>,
}

impl RouteSet {
    /// Compile stored records into a snapshot.
    ///
    /// Disabled records and records with invalid patterns are excluded; the
    /// latter are logged and dropped rather than failing the build.
    pub fn build(stored: Vec<StoredRoute>) -> Self {
        let mut routes = Vec::with_capacity(stored.len());
        for record in stored {
            if !record.enabled {
                continue;
            }
            let id = record.id.clone();
            match RouteRecord::from_stored(record) {
                Ok(compiled) => routes.push(compiled),
                Err(e) => {
                    tracing::warn!(route_id = %id, error = %e, "dropping route with invalid path pattern");
                }
            }
        }
        // Stable sort keeps store read order as the tie-break.
        routes.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { routes }
    }

    /// Snapshot for the static single-target override: one synthetic record
    /// matching every request, invoked synchronously.
    pub fn single_target(target: &str) -> Self {
        Self {
            routes: vec![RouteRecord {
                id: "static".to_string(),
                methods: NameSet::Any,
                hosts: NameSet::Any,
                path: PathPattern::compile("/*").expect("wildcard pattern always compiles"),
                priority: 0,
                target: target.to_string(),
                mode: InvocationMode::Sync,
                log_capture: false,
                qualifier: None,
            }],
        }
    }

    /// Records in evaluation order: descending priority, store order on ties.
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
