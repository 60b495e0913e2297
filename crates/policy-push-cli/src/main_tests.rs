// crates/policy-push-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and config resolution.
// Purpose: Ensure render arguments parse as documented and config fails closed.
// Dependencies: policy-push-cli main helpers
// ============================================================================

//! ## Overview
//! Validates clap parsing for `render` and `config validate`, and that an
//! explicit config path is never silently replaced by defaults.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use clap::Parser;
use policy_push_core::InvalidPropertyPolicy;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::load_render_config;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn render_parses_repeated_and_comma_separated_drops() {
    let cli = Cli::try_parse_from([
        "policy-push",
        "render",
        "--snapshot",
        "catalog.json",
        "--backend-id",
        "10001",
        "--dropped",
        "7,9",
        "--dropped",
        "7",
        "--digest",
    ])
    .unwrap();

    let Some(Commands::Render(render)) = cli.command else {
        panic!("expected render command");
    };
    assert_eq!(render.backend_id, 10_001);
    assert_eq!(render.dropped, vec![7, 9, 7]);
    assert!(render.digest);
    assert!(render.config.is_none());
}

#[test]
fn render_requires_snapshot_and_backend() {
    assert!(Cli::try_parse_from(["policy-push", "render", "--backend-id", "1"]).is_err());
    assert!(Cli::try_parse_from(["policy-push", "render", "--snapshot", "c.json"]).is_err());
}

#[test]
fn config_validate_accepts_path() {
    let args = ["policy-push", "config", "validate", "--config", "push.toml"];
    let cli = Cli::try_parse_from(args).unwrap();
    let Some(Commands::Config {
        command: ConfigCommand::Validate(validate),
    }) = cli.command
    else {
        panic!("expected config validate");
    };
    assert_eq!(validate.config.unwrap().to_string_lossy(), "push.toml");
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_render_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.to_string().starts_with("failed to load config"));
}

#[test]
fn explicit_config_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy-push.toml");
    fs::write(&path, "[projection]\non_invalid_property = \"fail_build\"\n").unwrap();
    let config = load_render_config(Some(&path)).unwrap();
    assert_eq!(config.projection.on_invalid_property, InvalidPropertyPolicy::FailBuild);
}
