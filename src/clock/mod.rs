//! Competition clock core.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  request/cancel  ┌────────────────┐
//! │    Clock     │─────────────────▶│ FrameScheduler │
//! │   (driver)   │◀─────────────────│  (host frames) │
//! └──┬───────┬───┘     on_frame     └────────────────┘
//!    │       │
//!    │       ▼
//!    │  ┌──────────────────┐
//!    │  │ ThresholdWatcher │
//!    │  └──────────────────┘
//!    ▼
//! ClockEvent channel ──▶ SyncAdapter
//! ```
//!
//! The clock is single-threaded and cooperative: it integrates elapsed time
//! only inside [`Clock::on_frame`], and only for the one frame it is waiting
//! for.

mod driver;
mod error;
pub mod format;
pub mod frame;
pub mod source;
pub mod threshold;

pub use driver::{Clock, ClockEvent, StopOrigin};
pub use error::ClockError;
pub use format::{format_time, INDEFINITE_PLACEHOLDER};
pub use frame::{FrameHandle, FrameQueue, FrameScheduler};
pub use source::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use threshold::{Threshold, ThresholdWatcher};
