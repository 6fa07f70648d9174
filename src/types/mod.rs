//! Core data types for the attempt clock.
//!
//! This module defines the data structures used for:
//! - Clock modes and timer state
//! - Warning flags for the threshold watcher
//! - Clock configuration with validation
//! - IPC request/response and server notification serialization

mod error;

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{ensure_finite, ConfigurationError};

/// Default start value in seconds.
pub const DEFAULT_START_VALUE: f64 = 60.0;

/// Default frame interval in milliseconds (about 60 frames per second).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

// ============================================================================
// ClockMode
// ============================================================================

/// Operating mode of the clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum ClockMode {
    /// Counts down from the start value to zero
    #[default]
    Countdown,
    /// Counts up from zero to the start value
    CountUp,
    /// No time limit; shows a placeholder and never integrates
    Indefinite,
}

impl ClockMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockMode::Countdown => "countdown",
            ClockMode::CountUp => "count-up",
            ClockMode::Indefinite => "indefinite",
        }
    }

    /// Returns true if the clock integrates elapsed time in this mode.
    pub fn integrates(&self) -> bool {
        !matches!(self, ClockMode::Indefinite)
    }
}

impl std::fmt::Display for ClockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClockMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "countdown" => Ok(ClockMode::Countdown),
            "count-up" | "countup" => Ok(ClockMode::CountUp),
            "indefinite" => Ok(ClockMode::Indefinite),
            _ => Err(ConfigurationError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for ClockMode {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Represents the current state of the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Effective mode for the current run
    pub mode: ClockMode,
    /// Configured start value in seconds
    pub start_value: f64,
    /// Current timer value in seconds
    pub current_value: f64,
    /// True only while frame integration is active
    pub running: bool,
    /// Suppresses local audio cues for the current run
    pub silent: bool,
}

impl TimerState {
    /// Creates a stopped state showing the initial value for `mode`.
    pub fn new(mode: ClockMode, start_value: f64) -> Self {
        let mut state = Self {
            mode,
            start_value,
            current_value: 0.0,
            running: false,
            silent: false,
        };
        state.current_value = state.initial_value();
        state
    }

    /// Value shown after a reset: `start_value` when counting down, zero when
    /// counting up.
    pub fn initial_value(&self) -> f64 {
        match self.mode {
            ClockMode::CountUp => 0.0,
            ClockMode::Countdown | ClockMode::Indefinite => self.start_value,
        }
    }

    /// Value at which a run ends.
    pub fn terminal_value(&self) -> f64 {
        match self.mode {
            ClockMode::CountUp => self.start_value,
            ClockMode::Countdown | ClockMode::Indefinite => 0.0,
        }
    }

    /// Seconds left before the terminal value is reached.
    pub fn remaining(&self) -> f64 {
        match self.mode {
            ClockMode::CountUp => self.start_value - self.current_value,
            ClockMode::Countdown | ClockMode::Indefinite => self.current_value,
        }
    }

    /// Returns true if the current value is at or past the terminal bound.
    pub fn is_terminal(&self) -> bool {
        match self.mode {
            ClockMode::Countdown => self.current_value <= 0.0,
            ClockMode::CountUp => self.current_value >= self.start_value,
            ClockMode::Indefinite => false,
        }
    }

    /// Clamps a value into the range allowed for the current mode.
    ///
    /// Countdown values are only bounded below, so a run may begin above the
    /// configured start value.
    pub fn clamp(&self, value: f64) -> f64 {
        let value = value.max(0.0);
        match self.mode {
            ClockMode::CountUp => value.min(self.start_value),
            ClockMode::Countdown | ClockMode::Indefinite => value,
        }
    }

    /// Applies `delta` seconds of elapsed time in the direction of the mode.
    pub fn advance(&mut self, delta: f64) {
        match self.mode {
            ClockMode::Countdown => self.current_value -= delta,
            ClockMode::CountUp => self.current_value += delta,
            ClockMode::Indefinite => {}
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(ClockMode::Countdown, DEFAULT_START_VALUE)
    }
}

// ============================================================================
// WarningFlags
// ============================================================================

/// One flag per threshold; a set flag means its warning has been given
/// during the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFlags {
    pub initial_warning_given: bool,
    pub final_warning_given: bool,
    pub time_over_given: bool,
}

impl WarningFlags {
    /// Clears all flags.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Flags for a run starting with `remaining` seconds left.
    ///
    /// Thresholds already passed are pre-set so they do not fire
    /// retroactively.
    pub fn armed_for(remaining: f64) -> Self {
        Self {
            initial_warning_given: remaining < 90.0,
            final_warning_given: remaining < 30.0,
            time_over_given: remaining < 0.0,
        }
    }
}

// ============================================================================
// ClockConfig
// ============================================================================

/// Optional audio files overriding the built-in cue tones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueFiles {
    pub initial_warning: Option<PathBuf>,
    pub final_warning: Option<PathBuf>,
    pub time_over: Option<PathBuf>,
}

/// Configuration for the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Base mode (countdown or count-up)
    pub mode: ClockMode,
    /// Start value in seconds
    pub start_value: f64,
    /// Frame interval in milliseconds
    pub frame_interval_ms: u64,
    /// Whether audio cues are played at all
    pub sounds_enabled: bool,
    /// Cue file overrides
    pub cue_files: CueFiles,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mode: ClockMode::Countdown,
            start_value: DEFAULT_START_VALUE,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            sounds_enabled: true,
            cue_files: CueFiles::default(),
        }
    }
}

impl ClockConfig {
    /// Returns the configuration with the specified base mode.
    pub fn with_mode(mut self, mode: ClockMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the configuration with the specified start value.
    pub fn with_start_value(mut self, seconds: f64) -> Self {
        self.start_value = seconds;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_start_value(self.start_value)?;
        if !self.mode.integrates() {
            return Err(ConfigurationError::IndefiniteBaseMode);
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigurationError::InvalidFrameInterval);
        }
        Ok(())
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("設定ファイルを読み込めません: {}", path.display()))?;
        let config: ClockConfig = serde_json::from_str(&text)
            .with_context(|| format!("設定ファイルの形式が不正です: {}", path.display()))?;
        Ok(config)
    }
}

/// Rejects negative and non-finite start values.
pub fn validate_start_value(seconds: f64) -> Result<(), ConfigurationError> {
    ensure_finite(seconds)?;
    if seconds < 0.0 {
        return Err(ConfigurationError::NegativeStartValue(seconds));
    }
    Ok(())
}

// ============================================================================
// Commands and Notifications
// ============================================================================

/// A command pushed by the authoritative server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockCommand {
    /// Start running from `value`
    Start {
        value: f64,
        indefinite: bool,
        silent: bool,
    },
    /// Stop at the server's `value`
    Pause {
        value: f64,
        indefinite: bool,
        silent: bool,
    },
    /// Show `value` without running
    Display { value: f64, indefinite: bool },
    /// Return to the configured start value
    Reset,
    /// Stop at the locally computed value (user action on the client)
    Stop,
    /// Change the base mode and/or start value while stopped
    Configure {
        mode: Option<ClockMode>,
        start_value: Option<f64>,
    },
}

impl ClockCommand {
    /// Returns the command name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockCommand::Start { .. } => "start",
            ClockCommand::Pause { .. } => "pause",
            ClockCommand::Display { .. } => "display",
            ClockCommand::Reset => "reset",
            ClockCommand::Stop => "stop",
            ClockCommand::Configure { .. } => "configure",
        }
    }
}

/// A notification sent from the clock to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerNotification {
    /// The initial (90 second) warning was reached
    InitialWarning,
    /// The final (30 second) warning was reached
    FinalWarning,
    /// Time is over
    TimeOver,
    /// The client stopped the clock at `value`
    Stopped { value: f64 },
}

// ============================================================================
// IPC Types
// ============================================================================

/// Time parameters carried by start, pause and display requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeParams {
    /// Time value in seconds
    pub value: f64,
    /// Show the no-time-limit placeholder
    #[serde(default)]
    pub indefinite: bool,
    /// Suppress local audio cues
    #[serde(default)]
    pub silent: bool,
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start the clock
    Start {
        #[serde(flatten)]
        params: TimeParams,
    },
    /// Pause the clock at a value
    Pause {
        #[serde(flatten)]
        params: TimeParams,
    },
    /// Display a value without running
    Display {
        #[serde(flatten)]
        params: TimeParams,
    },
    /// Reset to the configured start value
    Reset,
    /// Stop locally and report the value to the server
    Stop,
    /// Change the base mode and/or start value
    Configure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<ClockMode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_value: Option<f64>,
    },
    /// Query the current status
    Status,
}

impl IpcRequest {
    /// Converts the request into a clock command.
    ///
    /// Returns `None` for status queries.
    pub fn into_command(self) -> Option<ClockCommand> {
        match self {
            IpcRequest::Start { params } => Some(ClockCommand::Start {
                value: params.value,
                indefinite: params.indefinite,
                silent: params.silent,
            }),
            IpcRequest::Pause { params } => Some(ClockCommand::Pause {
                value: params.value,
                indefinite: params.indefinite,
                silent: params.silent,
            }),
            IpcRequest::Display { params } => Some(ClockCommand::Display {
                value: params.value,
                indefinite: params.indefinite,
            }),
            IpcRequest::Reset => Some(ClockCommand::Reset),
            IpcRequest::Stop => Some(ClockCommand::Stop),
            IpcRequest::Configure { mode, start_value } => {
                Some(ClockCommand::Configure { mode, start_value })
            }
            IpcRequest::Status => None,
        }
    }
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Effective mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Current value in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Formatted display text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// Whether the clock is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
}

impl ResponseData {
    /// Creates response data from timer state and its display text.
    pub fn from_timer_state(state: &TimerState, display: &str) -> Self {
        Self {
            mode: Some(state.mode.as_str().to_string()),
            value: Some(state.current_value),
            display: Some(display.to_string()),
            running: Some(state.running),
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if this is a success response.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // ClockMode Tests
    // ------------------------------------------------------------------------

    mod clock_mode_tests {
        use super::*;

        #[test]
        fn test_default_is_countdown() {
            assert_eq!(ClockMode::default(), ClockMode::Countdown);
        }

        #[test]
        fn test_parse() {
            assert_eq!("countdown".parse::<ClockMode>(), Ok(ClockMode::Countdown));
            assert_eq!("Count-Up".parse::<ClockMode>(), Ok(ClockMode::CountUp));
            assert_eq!("countup".parse::<ClockMode>(), Ok(ClockMode::CountUp));
            assert_eq!("indefinite".parse::<ClockMode>(), Ok(ClockMode::Indefinite));
        }

        #[test]
        fn test_parse_unknown_mode() {
            let result: Result<ClockMode, _> = "sideways".parse();
            assert_eq!(
                result,
                Err(ConfigurationError::UnknownMode("sideways".to_string()))
            );
        }

        #[test]
        fn test_serialize_deserialize() {
            let json = serde_json::to_string(&ClockMode::CountUp).unwrap();
            assert_eq!(json, "\"count-up\"");

            let mode: ClockMode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, ClockMode::CountUp);
        }

        #[test]
        fn test_deserialize_unknown_mode_fails() {
            let result: Result<ClockMode, _> = serde_json::from_str("\"hourglass\"");
            let err = result.unwrap_err();
            assert!(err.to_string().contains("hourglass"));
        }

        #[test]
        fn test_integrates() {
            assert!(ClockMode::Countdown.integrates());
            assert!(ClockMode::CountUp.integrates());
            assert!(!ClockMode::Indefinite.integrates());
        }
    }

    // ------------------------------------------------------------------------
    // TimerState Tests
    // ------------------------------------------------------------------------

    mod timer_state_tests {
        use super::*;

        #[test]
        fn test_default_state() {
            let state = TimerState::default();
            assert_eq!(state.mode, ClockMode::Countdown);
            assert_eq!(state.start_value, 60.0);
            assert_eq!(state.current_value, 60.0);
            assert!(!state.running);
            assert!(!state.silent);
        }

        #[test]
        fn test_count_up_starts_at_zero() {
            let state = TimerState::new(ClockMode::CountUp, 60.0);
            assert_eq!(state.current_value, 0.0);
            assert_eq!(state.terminal_value(), 60.0);
            assert_eq!(state.remaining(), 60.0);
        }

        #[test]
        fn test_is_terminal() {
            let mut state = TimerState::new(ClockMode::Countdown, 60.0);
            assert!(!state.is_terminal());
            state.current_value = 0.0;
            assert!(state.is_terminal());
            state.current_value = -0.2;
            assert!(state.is_terminal());

            let mut state = TimerState::new(ClockMode::CountUp, 60.0);
            assert!(!state.is_terminal());
            state.current_value = 60.0;
            assert!(state.is_terminal());

            let state = TimerState::new(ClockMode::Indefinite, 60.0);
            assert!(!state.is_terminal());
        }

        #[test]
        fn test_clamp() {
            let state = TimerState::new(ClockMode::Countdown, 60.0);
            assert_eq!(state.clamp(-3.0), 0.0);
            assert_eq!(state.clamp(95.0), 95.0);

            let state = TimerState::new(ClockMode::CountUp, 60.0);
            assert_eq!(state.clamp(-3.0), 0.0);
            assert_eq!(state.clamp(95.0), 60.0);
        }

        #[test]
        fn test_advance() {
            let mut state = TimerState::new(ClockMode::Countdown, 60.0);
            state.advance(1.5);
            assert_eq!(state.current_value, 58.5);

            let mut state = TimerState::new(ClockMode::CountUp, 60.0);
            state.advance(1.5);
            assert_eq!(state.current_value, 1.5);

            let mut state = TimerState::new(ClockMode::Indefinite, 60.0);
            state.advance(1.5);
            assert_eq!(state.current_value, 60.0);
        }
    }

    // ------------------------------------------------------------------------
    // WarningFlags Tests
    // ------------------------------------------------------------------------

    mod warning_flags_tests {
        use super::*;

        #[test]
        fn test_armed_above_all_thresholds() {
            assert_eq!(WarningFlags::armed_for(95.0), WarningFlags::default());
        }

        #[test]
        fn test_armed_below_initial() {
            let flags = WarningFlags::armed_for(60.0);
            assert!(flags.initial_warning_given);
            assert!(!flags.final_warning_given);
            assert!(!flags.time_over_given);
        }

        #[test]
        fn test_armed_below_final() {
            let flags = WarningFlags::armed_for(10.0);
            assert!(flags.initial_warning_given);
            assert!(flags.final_warning_given);
            assert!(!flags.time_over_given);
        }

        #[test]
        fn test_armed_at_zero_keeps_time_over() {
            let flags = WarningFlags::armed_for(0.0);
            assert!(!flags.time_over_given);
            assert!(WarningFlags::armed_for(-1.0).time_over_given);
        }

        #[test]
        fn test_clear() {
            let mut flags = WarningFlags::armed_for(-1.0);
            flags.clear();
            assert_eq!(flags, WarningFlags::default());
        }
    }

    // ------------------------------------------------------------------------
    // ClockConfig Tests
    // ------------------------------------------------------------------------

    mod clock_config_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = ClockConfig::default();
            assert_eq!(config.mode, ClockMode::Countdown);
            assert_eq!(config.start_value, 60.0);
            assert_eq!(config.frame_interval_ms, 16);
            assert!(config.sounds_enabled);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_builder() {
            let config = ClockConfig::default()
                .with_mode(ClockMode::CountUp)
                .with_start_value(120.0);
            assert_eq!(config.mode, ClockMode::CountUp);
            assert_eq!(config.start_value, 120.0);
        }

        #[test]
        fn test_validate_negative_start_value() {
            let config = ClockConfig::default().with_start_value(-1.0);
            assert_eq!(
                config.validate(),
                Err(ConfigurationError::NegativeStartValue(-1.0))
            );
        }

        #[test]
        fn test_validate_non_finite_start_value() {
            let config = ClockConfig::default().with_start_value(f64::INFINITY);
            assert!(matches!(
                config.validate(),
                Err(ConfigurationError::NonFiniteValue(_))
            ));
        }

        #[test]
        fn test_validate_indefinite_base_mode() {
            let config = ClockConfig::default().with_mode(ClockMode::Indefinite);
            assert_eq!(
                config.validate(),
                Err(ConfigurationError::IndefiniteBaseMode)
            );
        }

        #[test]
        fn test_validate_zero_frame_interval() {
            let config = ClockConfig {
                frame_interval_ms: 0,
                ..ClockConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigurationError::InvalidFrameInterval)
            );
        }

        #[test]
        fn test_deserialize_partial_json() {
            let config: ClockConfig =
                serde_json::from_str(r#"{"mode":"count-up","start_value":120}"#).unwrap();
            assert_eq!(config.mode, ClockMode::CountUp);
            assert_eq!(config.start_value, 120.0);
            assert_eq!(config.frame_interval_ms, 16);
            assert!(config.cue_files.time_over.is_none());
        }

        #[test]
        fn test_from_json_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("clock.json");
            std::fs::write(
                &path,
                r#"{"start_value":90,"sounds_enabled":false,"cue_files":{"time_over":"/tmp/horn.wav"}}"#,
            )
            .unwrap();

            let config = ClockConfig::from_json_file(&path).unwrap();
            assert_eq!(config.start_value, 90.0);
            assert!(!config.sounds_enabled);
            assert_eq!(
                config.cue_files.time_over,
                Some(PathBuf::from("/tmp/horn.wav"))
            );
        }

        #[test]
        fn test_from_json_file_missing() {
            let result = ClockConfig::from_json_file(std::path::Path::new("/nonexistent/clock.json"));
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("読み込めません"));
        }
    }

    // ------------------------------------------------------------------------
    // IPC Types Tests
    // ------------------------------------------------------------------------

    mod ipc_types_tests {
        use super::*;

        #[test]
        fn test_start_request_deserialize() {
            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"start","value":95,"silent":true}"#).unwrap();
            assert_eq!(
                request,
                IpcRequest::Start {
                    params: TimeParams {
                        value: 95.0,
                        indefinite: false,
                        silent: true,
                    }
                }
            );
        }

        #[test]
        fn test_simple_requests_deserialize() {
            let request: IpcRequest = serde_json::from_str(r#"{"command":"reset"}"#).unwrap();
            assert_eq!(request, IpcRequest::Reset);
            let request: IpcRequest = serde_json::from_str(r#"{"command":"status"}"#).unwrap();
            assert_eq!(request, IpcRequest::Status);
        }

        #[test]
        fn test_request_serialize() {
            let request = IpcRequest::Display {
                params: TimeParams {
                    value: 120.0,
                    indefinite: true,
                    silent: false,
                },
            };
            let json = serde_json::to_value(&request).unwrap();
            assert_eq!(json["command"], "display");
            assert_eq!(json["value"], 120.0);
            assert_eq!(json["indefinite"], true);
        }

        #[test]
        fn test_into_command() {
            let request = IpcRequest::Pause {
                params: TimeParams {
                    value: 42.0,
                    indefinite: false,
                    silent: true,
                },
            };
            assert_eq!(
                request.into_command(),
                Some(ClockCommand::Pause {
                    value: 42.0,
                    indefinite: false,
                    silent: true,
                })
            );
            assert_eq!(IpcRequest::Status.into_command(), None);
            assert_eq!(IpcRequest::Stop.into_command(), Some(ClockCommand::Stop));
        }

        #[test]
        fn test_configure_request_deserialize() {
            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"configure","mode":"count-up"}"#).unwrap();
            assert_eq!(
                request,
                IpcRequest::Configure {
                    mode: Some(ClockMode::CountUp),
                    start_value: None,
                }
            );
            assert_eq!(
                request.into_command(),
                Some(ClockCommand::Configure {
                    mode: Some(ClockMode::CountUp),
                    start_value: None,
                })
            );

            let request: IpcRequest =
                serde_json::from_str(r#"{"command":"configure","start_value":120}"#).unwrap();
            assert_eq!(
                request,
                IpcRequest::Configure {
                    mode: None,
                    start_value: Some(120.0),
                }
            );
        }

        #[test]
        fn test_configure_request_unknown_mode_fails() {
            let result: Result<IpcRequest, _> =
                serde_json::from_str(r#"{"command":"configure","mode":"hourglass"}"#);
            assert!(result.is_err());
        }

        #[test]
        fn test_notification_serialize() {
            let json = serde_json::to_string(&ServerNotification::TimeOver).unwrap();
            assert_eq!(json, r#"{"event":"time_over"}"#);

            let json = serde_json::to_string(&ServerNotification::Stopped { value: 12.5 }).unwrap();
            assert_eq!(json, r#"{"event":"stopped","value":12.5}"#);
        }

        #[test]
        fn test_response_data_from_state() {
            let state = TimerState::default();
            let data = ResponseData::from_timer_state(&state, "1:00");
            assert_eq!(data.mode, Some("countdown".to_string()));
            assert_eq!(data.value, Some(60.0));
            assert_eq!(data.display, Some("1:00".to_string()));
            assert_eq!(data.running, Some(false));
        }

        #[test]
        fn test_response_success_and_error() {
            let ok = IpcResponse::success("ok", None);
            assert!(ok.is_success());
            let json = serde_json::to_string(&ok).unwrap();
            assert!(!json.contains("data"));

            let err = IpcResponse::error("bad");
            assert!(!err.is_success());
            assert_eq!(err.message, "bad");
        }
    }
}
