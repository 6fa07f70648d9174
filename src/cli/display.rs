//! Display utilities for the attempt clock CLI.
//!
//! This module provides formatted output for:
//! - Command results
//! - Error messages
//! - Status display

use crate::clock::ClockError;
use crate::types::{ConfigurationError, IpcResponse, ResponseData};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a command result with the clock reading.
    pub fn show_command_success(response: &IpcResponse) {
        println!("* {}", response.message);

        if let Some(line) = response.data.as_ref().and_then(Self::clock_line) {
            println!("  {}", line);
        }
    }

    /// Shows the current clock status.
    pub fn show_status(response: &IpcResponse) {
        println!("アテンプトクロック ステータス");
        println!("─────────────────────────────");

        match &response.data {
            Some(data) => {
                let running = data.running.unwrap_or(false);
                println!("状態: {}", if running { "実行中" } else { "停止中" });

                if let Some(mode) = &data.mode {
                    println!("モード: {}", Self::mode_label(mode));
                }
                if let Some(line) = Self::clock_line(data) {
                    println!("{}", line);
                }
            }
            None => println!("時計は起動していません"),
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Shows a command failure, with a hint for configuration errors.
    pub fn show_failure(error: &anyhow::Error) {
        Self::show_error(&format!("{:#}", error));
        if let Some(hint) = Self::suggestion(error) {
            eprintln!("ヒント: {}", hint);
        }
    }

    fn suggestion(error: &anyhow::Error) -> Option<&'static str> {
        error.chain().find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<ConfigurationError>() {
                return Some(e.suggestion());
            }
            match cause.downcast_ref::<ClockError>() {
                Some(ClockError::Configuration(e)) => Some(e.suggestion()),
                _ => None,
            }
        })
    }

    fn clock_line(data: &ResponseData) -> Option<String> {
        data.display.as_ref().map(|display| format!("表示: {}", display))
    }

    fn mode_label(mode: &str) -> &str {
        match mode {
            "countdown" => "カウントダウン",
            "count-up" => "カウントアップ",
            "indefinite" => "時間無制限",
            other => other,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
