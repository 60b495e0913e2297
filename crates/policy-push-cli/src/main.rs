// crates/policy-push-cli/src/main.rs
// ============================================================================
// Module: Policy Push CLI Entry Point
// Description: Command dispatcher for storage policy push tooling.
// Purpose: Render push tasks from catalog snapshots and validate config.
// Dependencies: clap, policy-push-cli, policy-push-config, policy-push-core, thiserror.
// ============================================================================

//! ## Overview
//! `policy-push render` loads a catalog snapshot, builds the storage policy
//! push for one backend, and writes the task to stdout as a JSON line. Audit
//! events go to the sink selected by config (stderr by default).
//! `policy-push config validate` checks a config file and exits.
//!
//! Security posture: inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use policy_push_cli::CatalogSnapshot;
use policy_push_cli::JsonLineDispatcher;
use policy_push_cli::read_snapshot;
use policy_push_config::CONFIG_ENV_VAR;
use policy_push_config::DEFAULT_CONFIG_NAME;
use policy_push_config::PolicyPushConfig;
use policy_push_core::AgentTask;
use policy_push_core::BackendId;
use policy_push_core::PolicyId;
use policy_push_core::send_task;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "policy-push", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a storage policy push from a catalog snapshot.
    Render(RenderCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a policy push configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `render`.
#[derive(Args, Debug)]
struct RenderCommand {
    /// Catalog snapshot JSON (`policies` and `resources` arrays).
    #[arg(long, value_name = "PATH")]
    snapshot: PathBuf,
    /// Backend the push is addressed to.
    #[arg(long, value_name = "ID")]
    backend_id: i64,
    /// Policy ids dropped since the previous push (repeatable or comma-separated).
    #[arg(long, value_name = "ID", value_delimiter = ',', allow_hyphen_values = true)]
    dropped: Vec<i64>,
    /// Emit the canonical request digest after the request line.
    #[arg(long, action = ArgAction::SetTrue)]
    digest: bool,
    /// Optional config file path (defaults to policy-push.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to policy-push.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("policy-push {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Render(command) => command_render(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Render Command
// ============================================================================

/// Executes `render`.
fn command_render(command: &RenderCommand) -> CliResult<ExitCode> {
    let config = load_render_config(command.config.as_deref())?;
    let audit = config
        .audit
        .build_sink()
        .map_err(|err| CliError::new(format!("failed to open audit sink: {err}")))?;
    let snapshot = read_snapshot(&command.snapshot)
        .and_then(CatalogSnapshot::load)
        .map_err(|err| CliError::new(err.to_string()))?;

    let dropped = command.dropped.iter().copied().map(PolicyId::new).collect();
    let task = AgentTask::push_storage_policy(
        snapshot.push_task(BackendId::new(command.backend_id), dropped),
    );
    let dispatcher = JsonLineDispatcher::new(std::io::stdout(), command.digest);
    send_task(
        &task,
        &snapshot.catalog,
        &config.projection_options(),
        audit.as_ref(),
        &dispatcher,
    )
    .map_err(|err| CliError::new(format!("render failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads config for `render`, falling back to defaults when none is present.
fn load_render_config(path: Option<&Path>) -> CliResult<PolicyPushConfig> {
    let implicit_absent = path.is_none()
        && env::var_os(CONFIG_ENV_VAR).is_none()
        && !Path::new(DEFAULT_CONFIG_NAME).exists();
    if implicit_absent {
        return Ok(PolicyPushConfig::default());
    }
    PolicyPushConfig::load(path)
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = PolicyPushConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
