//! Attempt clock CLI
//!
//! Runs the clock daemon, or sends server commands to a running daemon:
//! - `daemon` listens for start/pause/display/reset commands
//! - the other subcommands talk to it over a Unix socket

use anyhow::Result;
use clap::{CommandFactory, Parser};

use attempt_clock::cli::{Cli, Commands, DaemonArgs, Display, IpcClient};
use attempt_clock::daemon::{self, DaemonConfig};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_failure(&e);
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Daemon(args) => run_daemon(args, cli.socket).await?,
        Commands::Completions { shell } => generate_completions(shell),
        Commands::Status => {
            let response = IpcClient::for_socket(cli.socket)?.status().await?;
            Display::show_status(&response);
        }
        Commands::Start(args) => {
            let response = IpcClient::for_socket(cli.socket)?.start(&args).await?;
            Display::show_command_success(&response);
        }
        Commands::Pause(args) => {
            let response = IpcClient::for_socket(cli.socket)?.pause(&args).await?;
            Display::show_command_success(&response);
        }
        Commands::Display(args) => {
            let response = IpcClient::for_socket(cli.socket)?.display(&args).await?;
            Display::show_command_success(&response);
        }
        Commands::Reset => {
            let response = IpcClient::for_socket(cli.socket)?.reset().await?;
            Display::show_command_success(&response);
        }
        Commands::Stop => {
            let response = IpcClient::for_socket(cli.socket)?.stop().await?;
            Display::show_command_success(&response);
        }
        Commands::Configure(args) => {
            let response = IpcClient::for_socket(cli.socket)?.configure(&args).await?;
            Display::show_command_success(&response);
        }
    }

    Ok(())
}

/// Runs the daemon in the foreground.
async fn run_daemon(args: DaemonArgs, socket: Option<std::path::PathBuf>) -> Result<()> {
    let socket_path = match socket {
        Some(path) => path,
        None => daemon::default_socket_path()?,
    };

    let config = DaemonConfig {
        clock: args.clock_config()?,
        socket_path,
        notify_socket: args.notify_socket.clone(),
        render: args.render,
    };

    daemon::run(config).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
