//! Path pattern compilation.
//!
//! # Responsibilities
//! - Compile route path patterns once, at snapshot-build time
//! - Match request paths and extract named parameters
//!
//! # Pattern syntax
//! - literal segments: `/users/list`
//! - named parameters (one segment): `/users/:id`
//! - trailing wildcard (rest of path): `/files/*`
//! - `/` matches only the root path
//!
//! # Design Decisions
//! - Patterns are anchored (`^...$`); a route for `/users` does not match
//!   `/users/42`
//! - Compilation failure drops the record, it never fails a request

use regex::Regex;
use thiserror::Error;

/// A route pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid path pattern `{pattern}`: {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason: String,
}

/// A compiled route path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    regex: Regex,
    params: Vec<String>,
}

impl PathPattern {
    /// Compile a pattern into an anchored regex. Called once per record per
    /// refresh cycle, never on the request path.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() || !pattern.starts_with('/') {
            return Err(PatternError {
                pattern: pattern.to_string(),
                reason: "pattern must start with `/`".to_string(),
            });
        }

        if pattern == "/" {
            return Ok(Self {
                raw: pattern.to_string(),
                regex: Regex::new("^/$").expect("root pattern always compiles"),
                params: Vec::new(),
            });
        }

        let mut source = String::with_capacity(pattern.len() + 8);
        source.push('^');
        let mut params = Vec::new();
        let mut saw_wildcard = false;

        for segment in pattern.split('/').skip(1) {
            if saw_wildcard {
                return Err(PatternError {
                    pattern: pattern.to_string(),
                    reason: "`*` must be the final segment".to_string(),
                });
            }
            if segment == "*" {
                source.push_str("/(?:.*)");
                saw_wildcard = true;
            } else if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError {
                        pattern: pattern.to_string(),
                        reason: "named parameter is missing a name".to_string(),
                    });
                }
                source.push_str("/([^/]+)");
                params.push(name.to_string());
            } else {
                source.push('/');
                source.push_str(&regex::escape(segment));
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
            params,
        })
    }

    /// The pattern as written in the route record.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path`, returning captured named parameters in declaration order.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        let mut out = Vec::with_capacity(self.params.len());
        for (i, name) in self.params.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                out.push((name.clone(), value.as_str().to_string()));
            }
        }
        Some(out)
    }
}
