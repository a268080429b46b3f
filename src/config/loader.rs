//! Configuration loading pipeline: read, parse, apply overrides, validate.
//!
//! Validation collects every issue instead of stopping at the first, so a
//! bad file is fixed in one pass.

use std::path::Path;

use crate::config::schema::AppConfig;
use crate::error::{ConfigError, IssueSeverity, ValidationIssue};
use crate::proxy::parse_bind_addr;

/// CLI/environment overrides applied on top of file values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Overrides `proxy.bind`.
    pub bind: Option<String>,
    /// Overrides `proxy.upstream`.
    pub upstream: Option<String>,
    /// Overrides `proxy.ingress_prefix`.
    pub ingress_prefix: Option<String>,
}

/// Loads configuration from an optional file, applies overrides, and
/// validates the result.
///
/// With no file, defaults are the starting point.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing or unparsable, or if
/// the merged configuration fails validation.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let raw =
                std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
                    path: path.to_path_buf(),
                })?;
            serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        }
        None => AppConfig::default(),
    };

    if let Some(bind) = &overrides.bind {
        config.proxy.bind.clone_from(bind);
    }
    if let Some(upstream) = &overrides.upstream {
        config.proxy.upstream.clone_from(upstream);
    }
    if let Some(prefix) = &overrides.ingress_prefix {
        config.proxy.ingress_prefix.clone_from(prefix);
    }

    let issues = validate(&config);
    let errors: Vec<ValidationIssue> = issues
        .into_iter()
        .filter(|issue| issue.severity == IssueSeverity::Error)
        .collect();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::ValidationError {
            path: path.map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string()),
            errors,
        })
    }
}

/// Validates a configuration, collecting all issues.
#[must_use]
pub fn validate(config: &AppConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let Err(e) = parse_bind_addr(&config.proxy.bind) {
        issues.push(error("proxy.bind", &e.to_string()));
    } else if config.proxy.bind.starts_with("0.0.0.0") || config.proxy.bind.starts_with(':') {
        issues.push(ValidationIssue {
            path: "proxy.bind".to_string(),
            message: "binding to all interfaces".to_string(),
            severity: IssueSeverity::Warning,
        });
    }

    let upstream = &config.proxy.upstream;
    if !(upstream.starts_with("http://") || upstream.starts_with("https://")) {
        issues.push(error(
            "proxy.upstream",
            "must be an absolute http:// or https:// URL",
        ));
    } else {
        let host = upstream.split("://").nth(1).unwrap_or("");
        if host.trim_matches('/').is_empty() {
            issues.push(error("proxy.upstream", "missing host"));
        }
    }

    let prefix = &config.proxy.ingress_prefix;
    if !prefix.starts_with('/') {
        issues.push(error("proxy.ingress_prefix", "must start with '/'"));
    } else if prefix == "/" || prefix.len() > 1 && prefix.ends_with('/') {
        issues.push(error(
            "proxy.ingress_prefix",
            "must name a path segment without a trailing '/'",
        ));
    }

    if let Some(path) = &config.catalog.path
        && !path.exists()
    {
        issues.push(error(
            "catalog.path",
            &format!("file not found: {}", path.display()),
        ));
    }

    issues
}

fn error(path: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
        severity: IssueSeverity::Error,
    }
}

// ============================================================================
// Tests
// ============================================================================
