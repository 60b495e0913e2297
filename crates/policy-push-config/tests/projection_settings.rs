//! Projection and audit settings tests for policy-push-config.
// crates/policy-push-config/tests/projection_settings.rs
// =============================================================================
// Module: Projection Settings Tests
// Description: Validate [projection] and [audit] sections.
// Purpose: Ensure config converts into projection options and audit sinks.
// =============================================================================

use policy_push_config::AuditSinkKind;
use policy_push_config::ConfigError;
use policy_push_config::PolicyPushConfig;
use policy_push_core::InvalidPropertyPolicy;
use policy_push_core::ProjectionOptions;
use policy_push_core::S3Defaults;

type TestResult = Result<(), String>;

fn parse(contents: &str) -> Result<PolicyPushConfig, String> {
    PolicyPushConfig::from_toml(contents).map_err(|err| err.to_string())
}

fn assert_invalid(contents: &str, needle: &str) -> TestResult {
    match PolicyPushConfig::from_toml(contents) {
        Err(ConfigError::Invalid(message)) if message.contains(needle) => Ok(()),
        Err(error) => Err(format!("error {error} did not contain {needle}")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn defaults_match_core_defaults() -> TestResult {
    let config = parse("")?;
    if config.projection_options() != ProjectionOptions::default() {
        return Err("default config must map to default options".to_string());
    }
    if config.audit.sink != AuditSinkKind::Stderr {
        return Err("default audit sink must be stderr".to_string());
    }
    Ok(())
}

#[test]
fn overrides_apply_on_top_of_builtin_defaults() -> TestResult {
    let config = parse(
        r#"
[projection]
on_invalid_property = "fail_build"

[projection.s3_defaults]
max_connections = 128
connection_timeout_ms = 250
"#,
    )?;
    let options = config.projection_options();
    if options.on_invalid_property != InvalidPropertyPolicy::FailBuild {
        return Err("expected fail_build".to_string());
    }
    let expected = S3Defaults {
        max_connections: 128,
        request_timeout_ms: 3_000,
        connection_timeout_ms: 250,
    };
    if options.s3_defaults != expected {
        return Err(format!(
            "unexpected defaults {} {} {}",
            options.s3_defaults.max_connections,
            options.s3_defaults.request_timeout_ms,
            options.s3_defaults.connection_timeout_ms
        ));
    }
    Ok(())
}

#[test]
fn non_positive_defaults_are_rejected() -> TestResult {
    assert_invalid(
        "[projection.s3_defaults]\nmax_connections = 0\n",
        "max_connections must be greater than zero",
    )?;
    assert_invalid(
        "[projection.s3_defaults]\nrequest_timeout_ms = -5\n",
        "request_timeout_ms must be greater than zero",
    )?;
    Ok(())
}

#[test]
fn oversized_defaults_are_rejected() -> TestResult {
    assert_invalid(
        "[projection.s3_defaults]\nconnection_timeout_ms = 3600001\n",
        "connection_timeout_ms must be at most",
    )?;
    assert_invalid("[projection.s3_defaults]\nmax_connections = 5000\n", "must be at most 4096")?;
    Ok(())
}

#[test]
fn file_sink_requires_path() -> TestResult {
    assert_invalid("[audit]\nsink = \"file\"\n", "audit.path is required")?;
    assert_invalid("[audit]\nsink = \"file\"\npath = \"\"\n", "audit.path must be non-empty")?;
    Ok(())
}

#[test]
fn path_without_file_sink_is_rejected() -> TestResult {
    assert_invalid(
        "[audit]\nsink = \"none\"\npath = \"audit.log\"\n",
        "only valid for the file sink",
    )?;
    Ok(())
}

#[test]
fn file_sink_builds_and_appends() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("push-audit.log");
    let contents = format!("[audit]\nsink = \"file\"\npath = '{}'\n", path.display());
    let config = parse(&contents)?;
    config.audit.build_sink().map_err(|err| err.to_string())?;
    if !path.exists() {
        return Err("audit file was not created".to_string());
    }
    Ok(())
}

#[test]
fn file_sink_reports_unopenable_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("missing").join("audit.log");
    let contents = format!("[audit]\nsink = \"file\"\npath = '{}'\n", path.display());
    let config = parse(&contents)?;
    match config.audit.build_sink() {
        Err(ConfigError::Io(_)) => Ok(()),
        Err(other) => Err(format!("unexpected error {other}")),
        Ok(_) => Err("expected io error".to_string()),
    }
}
