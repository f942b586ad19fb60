// crates/convert-ssr-cli/src/main.rs
// ============================================================================
// Module: Convert SSR CLI Entry Point
// Description: Command dispatcher for the bootstrap server and config tools.
// Purpose: Serve pages, validate config, and render a query from the shell.
// Dependencies: clap, convert-ssr-config, convert-ssr-server, serde_json, tokio.
// ============================================================================

//! ## Overview
//! `convert-ssr` starts the bootstrap server, validates and prints
//! configuration, and runs the configured strategy once for a query string
//! so operators can inspect the render locals a page would receive.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use convert_ssr_config::ConvertSsrConfig;
use convert_ssr_config::config_toml_example;
use convert_ssr_core::RenderLocals;
use convert_ssr_server::SsrServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "convert-ssr", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bootstrap HTTP server.
    Serve(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Run the configured strategy once and print the render locals.
    Render(RenderCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigArgs),
    /// Print a canonical example configuration.
    Example,
}

/// Shared config path argument.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to convert-ssr.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `render` command.
#[derive(Args, Debug)]
struct RenderCommand {
    /// Query string to bootstrap, for example `convert=USD,EUR:10`.
    #[arg(long, value_name = "QUERY")]
    query: String,
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Serve(args) => command_serve(&args).await,
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Render(command) => command_render(&command).await,
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(args: &ConfigArgs) -> CliResult<ExitCode> {
    let server = build_server(args)?;
    write_stderr_line(&format!(
        "convert-ssr: serving with strategy {}",
        server.state().strategy_name()
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(&args),
        ConfigCommand::Example => {
            write_stdout_line(config_toml_example().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let _config = load_config(args)?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `render` command.
async fn command_render(command: &RenderCommand) -> CliResult<ExitCode> {
    let server = build_server(&command.config)?;
    let locals = server
        .state()
        .render_query(&command.query)
        .await
        .map_err(|err| CliError::new(format!("render failed ({}): {err}", err.kind())))?
        .unwrap_or_default();
    write_stdout_line(&render_locals_json(&locals)?)
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration from the CLI path or defaults.
fn load_config(args: &ConfigArgs) -> CliResult<ConvertSsrConfig> {
    ConvertSsrConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Loads configuration and assembles the server.
fn build_server(args: &ConfigArgs) -> CliResult<SsrServer> {
    let config = load_config(args)?;
    SsrServer::from_config(config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))
}

/// Serializes render locals as pretty JSON.
fn render_locals_json(locals: &RenderLocals) -> CliResult<String> {
    serde_json::to_string_pretty(locals)
        .map_err(|err| CliError::new(format!("failed to serialize render locals: {err}")))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
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
