//! Request matching against a route snapshot.
//!
//! # Responsibilities
//! - Scan the snapshot in its stored (priority-descending) order
//! - Check method, host and path conditions with AND semantics
//! - Return the first full match, or an explicit no-match
//!
//! # Design Decisions
//! - First match wins, so priority decides overlapping routes and store read
//!   order breaks exact priority ties
//! - Host comparison is case-insensitive; method comparison is exact
//! - A request without a Host header only matches wildcard-host routes

use crate::routes::record::{RouteRecord, RouteSet};

/// A matched route plus the path parameters its pattern captured.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub record: &'a RouteRecord,
    pub path_params: Vec<(String, String)>,
}

/// Select the single applicable route for a request, or `None`.
pub fn match_route<'a>(
    set: &'a RouteSet,
    method: &str,
    host: Option<&str>,
    path: &str,
) -> Option<RouteMatch<'a>> {
    let host = host.map(|h| h.to_ascii_lowercase());
    for record in set.routes() {
        if !record.methods.contains(method) {
            continue;
        }
        let host_ok = match &host {
            Some(h) => record.hosts.contains(h),
            None => matches!(record.hosts, crate::routes::record::NameSet::Any),
        };
        if !host_ok {
            continue;
        }
        if let Some(path_params) = record.path.captures(path) {
            return Some(RouteMatch {
                record,
                path_params,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::record::StoredRoute;

    fn stored(id: &str, priority: i64, methods: &[&str], hosts: &[&str], path: &str) -> StoredRoute {
        StoredRoute {
            id: id.to_string(),
            enabled: true,
            match_methods: methods.iter().map(|s| s.to_string()).collect(),
            match_hosts: hosts.iter().map(|s| s.to_string()).collect(),
            match_path: path.to_string(),
            priority,
            function_name: format!("fn-{id}"),
            invocation_type: "RequestResponse".to_string(),
            log_type: None,
            qualifier: None,
        }
    }

    #[test]
    fn higher_priority_beats_wildcard() {
        let set = RouteSet::build(vec![
            stored("wild", 5, &["*"], &["*"], "/*"),
            stored("exact", 10, &["*"], &["*"], "/a"),
        ]);
        let matched = match_route(&set, "GET", None, "/a").unwrap();
        assert_eq!(matched.record.id, "exact");
        // everything else still lands on the wildcard
        let matched = match_route(&set, "GET", None, "/b").unwrap();
        assert_eq!(matched.record.id, "wild");
    }

    #[test]
    fn equal_priority_tie_break_is_deterministic() {
        let set = RouteSet::build(vec![
            stored("first", 5, &["*"], &["*"], "/*"),
            stored("second", 5, &["*"], &["*"], "/*"),
        ]);
        for _ in 0..10 {
            let matched = match_route(&set, "GET", None, "/x").unwrap();
            assert_eq!(matched.record.id, "first");
        }
    }

    #[test]
    fn method_membership_filters() {
        let set = RouteSet::build(vec![stored("r", 0, &["GET", "HEAD"], &["*"], "/a")]);
        assert!(match_route(&set, "GET", None, "/a").is_some());
        assert!(match_route(&set, "HEAD", None, "/a").is_some());
        assert!(match_route(&set, "POST", None, "/a").is_none());
    }

    #[test]
    fn host_membership_is_case_insensitive() {
        let set = RouteSet::build(vec![stored("r", 0, &["*"], &["api.example.com"], "/a")]);
        assert!(match_route(&set, "GET", Some("API.EXAMPLE.COM"), "/a").is_some());
        assert!(match_route(&set, "GET", Some("other.example.com"), "/a").is_none());
        // no Host header: only wildcard-host routes apply
        assert!(match_route(&set, "GET", None, "/a").is_none());
    }

    #[test]
    fn missing_host_matches_wildcard_route() {
        let set = RouteSet::build(vec![stored("r", 0, &["*"], &["*"], "/a")]);
        assert!(match_route(&set, "GET", None, "/a").is_some());
    }

    #[test]
    fn no_match_is_explicit() {
        let set = RouteSet::build(vec![stored("r", 0, &["*"], &["*"], "/only")]);
        assert!(match_route(&set, "GET", None, "/other").is_none());
    }

    #[test]
    fn path_parameters_are_captured() {
        let set = RouteSet::build(vec![stored("r", 0, &["*"], &["*"], "/users/:id")]);
        let matched = match_route(&set, "GET", None, "/users/42").unwrap();
        assert_eq!(
            matched.path_params,
            vec![("id".to_string(), "42".to_string())]
        );
    }
}
