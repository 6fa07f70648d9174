//! Command definitions for the attempt clock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::types::{ClockConfig, ClockMode, TimeParams};

// ============================================================================
// CLI Structure
// ============================================================================

/// Attempt clock CLI - competition countdown and count-up clock
#[derive(Parser, Debug)]
#[command(
    name = "attempt-clock",
    version,
    about = "競技用アテンプトクロック",
    long_about = "サーバーからのコマンドで動作するカウントダウン/カウントアップ時計。\n\
                  90秒・30秒の警告とタイムオーバーを音とサーバー通知で知らせます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (default: ~/.attempt-clock/clock.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the clock from a value in seconds
    Start(TimeArgs),

    /// Stop the clock at the server's value in seconds
    Pause(TimeArgs),

    /// Show a value without running
    Display(DisplayArgs),

    /// Return to the configured start value
    Reset,

    /// Stop the clock and report the current value to the server
    Stop,

    /// Show current clock status
    Status,

    /// Change the base mode or start value of a stopped clock
    Configure(ConfigureArgs),

    /// Run the clock daemon
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the start and pause commands
#[derive(Args, Debug, Clone, Default)]
pub struct TimeArgs {
    /// Time value in seconds (negative means time is already over)
    #[arg(
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_seconds
    )]
    pub value: f64,

    /// Show the no-time-limit placeholder
    #[arg(short, long)]
    pub indefinite: bool,

    /// Suppress local audio cues
    #[arg(short, long)]
    pub silent: bool,
}

impl From<&TimeArgs> for TimeParams {
    fn from(args: &TimeArgs) -> Self {
        Self {
            value: args.value,
            indefinite: args.indefinite,
            silent: args.silent,
        }
    }
}

/// Arguments for the display command
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Time value in seconds
    #[arg(
        default_value_t = 0.0,
        allow_negative_numbers = true,
        value_parser = parse_seconds
    )]
    pub value: f64,

    /// Show the no-time-limit placeholder
    #[arg(short, long)]
    pub indefinite: bool,
}

impl From<&DisplayArgs> for TimeParams {
    fn from(args: &DisplayArgs) -> Self {
        Self {
            value: args.value,
            indefinite: args.indefinite,
            silent: false,
        }
    }
}

/// Arguments for the configure command
#[derive(Args, Debug, Clone, Default)]
#[command(group(
    ArgGroup::new("setting")
        .required(true)
        .multiple(true)
        .args(["mode", "start_value"])
))]
pub struct ConfigureArgs {
    /// New base mode: countdown or count-up
    #[arg(short, long)]
    pub mode: Option<ClockMode>,

    /// New start value in seconds
    #[arg(long, allow_negative_numbers = true, value_parser = parse_seconds)]
    pub start_value: Option<f64>,
}

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Clock mode: countdown or count-up
    #[arg(short, long)]
    pub mode: Option<ClockMode>,

    /// Configured start value in seconds
    #[arg(long, allow_negative_numbers = true, value_parser = parse_seconds)]
    pub start_value: Option<f64>,

    /// Server socket that receives notifications
    #[arg(long, value_name = "PATH")]
    pub notify_socket: Option<PathBuf>,

    /// Frame interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: Option<u64>,

    /// Disable audio cues
    #[arg(long)]
    pub no_sound: bool,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Audio file for the initial (90 second) warning
    #[arg(long, value_name = "FILE")]
    pub initial_warning_sound: Option<PathBuf>,

    /// Audio file for the final (30 second) warning
    #[arg(long, value_name = "FILE")]
    pub final_warning_sound: Option<PathBuf>,

    /// Audio file for time over
    #[arg(long, value_name = "FILE")]
    pub time_over_sound: Option<PathBuf>,

    /// Draw the clock on stdout
    #[arg(long)]
    pub render: bool,
}

impl DaemonArgs {
    /// Builds the clock configuration from the optional file and the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the result is invalid.
    pub fn clock_config(&self) -> Result<ClockConfig> {
        let mut config = match &self.config {
            Some(path) => ClockConfig::from_json_file(path)?,
            None => ClockConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(start_value) = self.start_value {
            config.start_value = start_value;
        }
        if let Some(frame_ms) = self.frame_ms {
            config.frame_interval_ms = frame_ms;
        }
        if self.no_sound {
            config.sounds_enabled = false;
        }
        if let Some(path) = &self.initial_warning_sound {
            config.cue_files.initial_warning = Some(path.clone());
        }
        if let Some(path) = &self.final_warning_sound {
            config.cue_files.final_warning = Some(path.clone());
        }
        if let Some(path) = &self.time_over_sound {
            config.cue_files.time_over = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a finite number of seconds.
fn parse_seconds(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("数値を指定してください: {}", s))?;
    if !value.is_finite() {
        return Err("有限の数値を指定してください".to_string());
    }
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================
