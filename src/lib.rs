//! Attempt Clock Library
//!
//! This library provides the core functionality for a competition attempt
//! clock driven by an authoritative server. It includes:
//! - Clock driver with countdown, count-up and indefinite modes
//! - Warning thresholds (90 s, 30 s, time over) evaluated every frame
//! - Sync adapter mapping server commands and notifications
//! - Audio cues for each warning
//! - IPC server/client for daemon-CLI communication
//! - Type definitions for configuration and wire messages

pub mod cli;
pub mod clock;
pub mod daemon;
pub mod sound;
pub mod sync;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{
    format_time, Clock, ClockError, ClockEvent, FrameHandle, FrameQueue, FrameScheduler,
    ManualTimeSource, StopOrigin, SystemTimeSource, Threshold, TimeSource,
};
pub use types::{
    ClockCommand, ClockConfig, ClockMode, ConfigurationError, IpcRequest, IpcResponse,
    ResponseData, ServerNotification, TimeParams, TimerState, WarningFlags,
};

// Re-export sound types
pub use sound::{Cue, CuePlayer, CueWorker, MockCuePlayer, SoundError};

// Re-export sync types
pub use sync::{
    ChannelNotifier, ClockRenderer, MockServerNotifier, NotifyError, ServerNotifier, SyncAdapter,
};
