// crates/policy-push-config/src/config.rs
// ============================================================================
// Module: Policy Push Configuration
// Description: Configuration loading and validation for policy push.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: policy-push-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys, out-of-range defaults, and inconsistent audit settings are
//! rejected rather than ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use policy_push_core::FileAuditSink;
use policy_push_core::InvalidPropertyPolicy;
use policy_push_core::NoopAuditSink;
use policy_push_core::ProjectionOptions;
use policy_push_core::PushAuditSink;
use policy_push_core::S3Defaults;
use policy_push_core::StderrAuditSink;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "policy-push.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "POLICY_PUSH_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Upper bound for the S3 max connections default.
pub(crate) const MAX_S3_CONNECTIONS: i32 = 4096;
/// Upper bound for S3 timeout defaults (one hour).
pub(crate) const MAX_S3_TIMEOUT_MS: i32 = 3_600_000;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration for policy push tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyPushConfig {
    /// Projection behavior.
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PolicyPushConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `POLICY_PUSH_CONFIG`, then
    /// `policy-push.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.projection.validate()?;
        self.audit.validate()
    }

    /// Returns the projection options this configuration selects.
    #[must_use]
    pub fn projection_options(&self) -> ProjectionOptions {
        self.projection.to_options()
    }
}

/// Projection configuration (`[projection]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Handling of malformed numeric resource properties.
    #[serde(default)]
    pub on_invalid_property: InvalidPropertyPolicy,
    /// Overrides for absent S3 numeric properties.
    #[serde(default)]
    pub s3_defaults: S3DefaultsConfig,
}

impl ProjectionConfig {
    /// Validates projection overrides.
    fn validate(&self) -> Result<(), ConfigError> {
        self.s3_defaults.validate()
    }

    /// Converts into core projection options.
    #[must_use]
    pub fn to_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            on_invalid_property: self.on_invalid_property,
            s3_defaults: self.s3_defaults.resolve(),
        }
    }
}

/// S3 default overrides (`[projection.s3_defaults]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct S3DefaultsConfig {
    /// Override for the max connections default.
    #[serde(default)]
    pub max_connections: Option<i32>,
    /// Override for the request timeout default (milliseconds).
    #[serde(default)]
    pub request_timeout_ms: Option<i32>,
    /// Override for the connection timeout default (milliseconds).
    #[serde(default)]
    pub connection_timeout_ms: Option<i32>,
}

impl S3DefaultsConfig {
    /// Validates override ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(value) = self.max_connections {
            check_range("projection.s3_defaults.max_connections", value, MAX_S3_CONNECTIONS)?;
        }
        if let Some(value) = self.request_timeout_ms {
            check_range("projection.s3_defaults.request_timeout_ms", value, MAX_S3_TIMEOUT_MS)?;
        }
        if let Some(value) = self.connection_timeout_ms {
            check_range("projection.s3_defaults.connection_timeout_ms", value, MAX_S3_TIMEOUT_MS)?;
        }
        Ok(())
    }

    /// Applies overrides on top of the built-in defaults.
    #[must_use]
    pub fn resolve(&self) -> S3Defaults {
        let builtin = S3Defaults::default();
        S3Defaults {
            max_connections: self.max_connections.unwrap_or(builtin.max_connections),
            request_timeout_ms: self.request_timeout_ms.unwrap_or(builtin.request_timeout_ms),
            connection_timeout_ms: self
                .connection_timeout_ms
                .unwrap_or(builtin.connection_timeout_ms),
        }
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Discard audit events.
    None,
}

/// Audit configuration (`[audit]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Audit log path; required for the file sink only.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates sink and path consistency.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid("audit.path must be non-empty".to_string()));
                }
                validate_path(path)
            }
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid for the file sink".to_string(),
            )),
            (AuditSinkKind::Stderr | AuditSinkKind::None, None) => Ok(()),
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn build_sink(&self) -> Result<Box<dyn PushAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Requires `value` to lie in `1 ..= max`.
fn check_range(field: &str, value: i32, max: i32) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > max {
        return Err(ConfigError::Invalid(format!("{field} must be at most {max}")));
    }
    Ok(())
}
