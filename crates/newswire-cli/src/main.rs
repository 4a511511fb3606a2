// newswire-cli/src/main.rs
// ============================================================================
// Module: Newswire CLI Entry Point
// Description: Command dispatcher for the Newswire MCP gateway.
// Purpose: Start the gateway and inspect the tool catalog from the shell.
// Dependencies: clap, newswire-core, newswire-mcp, tokio
// ============================================================================

//! ## Overview
//! The Newswire CLI starts the MCP gateway on the selected transport and
//! prints the advertised tool catalog. Configuration comes from the process
//! environment; command-line flags override the listen port and transport.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use newswire_core::catalog::catalog;
use newswire_core::catalog::tool_definitions;
use newswire_mcp::ConfigError;
use newswire_mcp::McpServer;
use newswire_mcp::McpServerError;
use newswire_mcp::NewswireConfig;
use newswire_mcp::ServerTransport;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "newswire", version, about = "MCP gateway for the World News API")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Newswire MCP gateway.
    Serve(ServeCommand),
    /// Print the advertised tool catalog.
    Tools(ToolsCommand),
}

/// Arguments for the serve subcommand.
#[derive(clap::Args, Debug)]
struct ServeCommand {
    /// Transport to serve requests on.
    #[arg(long, value_enum, default_value_t = TransportArg::Stdio)]
    transport: TransportArg,
    /// HTTP listen port override.
    #[arg(long)]
    port: Option<u16>,
}

/// Arguments for the tools subcommand.
#[derive(clap::Args, Debug)]
struct ToolsCommand {
    /// Print the catalog as JSON tool definitions.
    #[arg(long)]
    json: bool,
}

/// Transport selection flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TransportArg {
    /// Line-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP.
    Http,
}

impl From<TransportArg> for ServerTransport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI failures surfaced to the shell.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration failed to load or validate.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The server failed to start or serve.
    #[error(transparent)]
    Server(#[from] McpServerError),
    /// The async runtime could not be created.
    #[error("runtime error: {0}")]
    Runtime(String),
    /// Writing to the output stream failed.
    #[error("output error: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(std::io::stderr(), "newswire: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected subcommand.
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve(command) => serve(&command),
        Commands::Tools(command) => print_tools(&command),
    }
}

/// Starts the gateway with environment configuration and flag overrides.
fn serve(command: &ServeCommand) -> Result<(), CliError> {
    let mut config = NewswireConfig::from_env()?;
    config.transport = command.transport.into();
    if let Some(port) = command.port {
        config.port = port;
    }
    let server = McpServer::from_config(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::Runtime(err.to_string()))?;
    runtime.block_on(server.serve())?;
    Ok(())
}

/// Prints the tool catalog as a table or as JSON definitions.
fn print_tools(command: &ToolsCommand) -> Result<(), CliError> {
    let mut stdout = std::io::stdout();
    if command.json {
        let payload = serde_json::to_string_pretty(&tool_definitions())
            .map_err(|err| CliError::Output(err.to_string()))?;
        writeln!(stdout, "{payload}").map_err(|err| CliError::Output(err.to_string()))?;
        return Ok(());
    }
    for spec in catalog() {
        writeln!(stdout, "{:<32} {}", spec.name.as_str(), spec.description)
            .map_err(|err| CliError::Output(err.to_string()))?;
    }
    Ok(())
}
