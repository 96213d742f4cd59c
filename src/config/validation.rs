//! Semantic configuration checks, separate from serde's syntactic ones.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("exactly one of routes.routes_file and routes.static_target must be set")]
    RouteSourceConflict,

    #[error("a route source is required: set routes.routes_file or routes.static_target")]
    RouteSourceMissing,

    #[error("routes.refresh_interval_secs must be greater than zero")]
    ZeroRefreshInterval,

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("invalid listener.bind_address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid invoker.base_url `{url}`: {reason}")]
    InvalidInvokerUrl { url: String, reason: String },

    #[error("invalid observability.metrics_address `{0}`")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration. All problems are reported at once.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (&config.routes.routes_file, &config.routes.static_target) {
        (Some(_), Some(_)) => errors.push(ValidationError::RouteSourceConflict),
        (None, None) => errors.push(ValidationError::RouteSourceMissing),
        _ => {}
    }

    if config.routes.refresh_interval_secs == 0 {
        errors.push(ValidationError::ZeroRefreshInterval);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(e) = url::Url::parse(&config.invoker.base_url) {
        errors.push(ValidationError::InvalidInvokerUrl {
            url: config.invoker.base_url.clone(),
            reason: e.to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.routes.routes_file = Some("/etc/gateway/routes.json".into());
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_missing_route_source() {
        let config = GatewayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::RouteSourceMissing)));
    }

    #[test]
    fn rejects_conflicting_route_sources() {
        let mut config = valid_config();
        config.routes.static_target = Some("fn".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::RouteSourceConflict)));
    }

    #[test]
    fn rejects_zero_interval_and_limit() {
        let mut config = valid_config();
        config.routes.refresh_interval_secs = 0;
        config.limits.max_body_bytes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rejects_bad_addresses() {
        let mut config = valid_config();
        config.listener.bind_address = "not-an-address".to_string();
        config.invoker.base_url = "::: nope".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidBindAddress(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidInvokerUrl { .. })));
    }
}
