//! Error types for WaterSafe.
//!
//! One enum per domain (config, catalog, wizard, proxy, prefs), aggregated
//! into a top-level [`WaterSafeError`] that maps each variant to a process
//! exit code.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for WaterSafe CLI operations.
///
/// These follow Unix conventions: 0 success, small positive codes for
/// domain-specific failures, 64 for usage errors, 128+signal for signals.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Proxy error (bind failed, serve failed)
    pub const PROXY_ERROR: i32 = 4;

    /// Catalog error (dataset failed to parse or validate)
    pub const CATALOG_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for WaterSafe operations.
///
/// Aggregates all domain-specific errors and provides a unified interface
/// for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum WaterSafeError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog loading or validation error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wizard state machine contract violation
    #[error(transparent)]
    Wizard(#[from] WizardError),

    /// Proxy server error
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// Preference store error
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl WaterSafeError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Catalog(_) => ExitCode::CATALOG_ERROR,
            Self::Proxy(_) => ExitCode::PROXY_ERROR,
            Self::Wizard(_) | Self::Prefs(_) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}: {} issue(s)", .errors.len())]
    ValidationError {
        /// Describes where the configuration came from
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while validating configuration or catalog
/// data.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g. `proxy.upstream` or
    /// `water-borne[2].symptoms`)
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: IssueSeverity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Validation failure that prevents the data from being used
    Error,
    /// Potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Catalog Errors
// ============================================================================

/// Health-condition catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog YAML failed to parse
    #[error("catalog parse error in {source_name}: {message}")]
    ParseError {
        /// Where the catalog came from (`<embedded>` or a file path)
        source_name: String,
        /// Error message from the parser
        message: String,
    },

    /// Catalog file not found
    #[error("catalog file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Catalog data failed validation
    #[error("catalog validation failed for {source_name}: {} issue(s)", .errors.len())]
    Invalid {
        /// Where the catalog came from
        source_name: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },
}

// ============================================================================
// Wizard Errors
// ============================================================================

/// Wizard state machine errors.
///
/// These are contract violations, not user-facing failures: a correct caller
/// only ever offers choices the current state permits.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Operation invoked from a state that does not permit it
    #[error("invalid wizard transition: {action} is not valid at step {step}")]
    InvalidTransition {
        /// The operation that was attempted
        action: &'static str,
        /// The step the wizard was on (1-3)
        step: u8,
    },

    /// Named condition does not exist in the selected category
    #[error("unknown condition '{name}' in category '{category}'")]
    UnknownCondition {
        /// The requested condition name
        name: String,
        /// The category it was looked up in
        category: String,
    },
}

// ============================================================================
// Proxy Errors
// ============================================================================

/// Proxy server and forwarding errors.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Failed to bind or serve the ingress listener
    #[error("bind failed: {0}")]
    Bind(String),

    /// Upstream request failed (network, DNS, timeout — deliberately
    /// flattened into one variant; the handler turns this into a 500)
    #[error("{0}")]
    Upstream(String),
}

// ============================================================================
// Preference Errors
// ============================================================================

/// Preference store errors.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// Reading or writing the preference backend failed
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored preference document failed to serialize
    #[error("preference encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A string did not name a known user type
    #[error("invalid user type '{0}' (expected 'expecting' or 'baby')")]
    InvalidUserType(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for WaterSafe operations.
pub type Result<T> = std::result::Result<T, WaterSafeError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::PROXY_ERROR, 4);
        assert_eq!(ExitCode::CATALOG_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn config_error_exit_code() {
        let err: WaterSafeError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn catalog_error_exit_code() {
        let err: WaterSafeError = CatalogError::Invalid {
            source_name: "<embedded>".to_string(),
            errors: vec![],
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CATALOG_ERROR);
    }

    #[test]
    fn proxy_error_exit_code() {
        let err: WaterSafeError = ProxyError::Bind("test".to_string()).into();
        assert_eq!(err.exit_code(), ExitCode::PROXY_ERROR);
    }

    #[test]
    fn wizard_error_exit_code() {
        let err: WaterSafeError = WizardError::InvalidTransition {
            action: "select_condition",
            step: 1,
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::ERROR);
    }

    #[test]
    fn io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: WaterSafeError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn validation_issue_display() {
        let issue = ValidationIssue {
            path: "proxy.upstream".to_string(),
            message: "not an absolute URL".to_string(),
            severity: IssueSeverity::Error,
        };
        assert_eq!(
            issue.to_string(),
            "error: not an absolute URL at proxy.upstream"
        );
    }

    #[test]
    fn validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "proxy.bind".to_string(),
            message: "binding to all interfaces".to_string(),
            severity: IssueSeverity::Warning,
        };
        assert_eq!(
            issue.to_string(),
            "warning: binding to all interfaces at proxy.bind"
        );
    }

    #[test]
    fn wizard_error_display() {
        let err = WizardError::UnknownCondition {
            name: "Dragon Pox".to_string(),
            category: "water-borne".to_string(),
        };
        assert!(err.to_string().contains("Dragon Pox"));
        assert!(err.to_string().contains("water-borne"));
    }
}
