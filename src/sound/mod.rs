//! Audio cue system for the attempt clock.
//!
//! This module provides the three warning cues:
//!
//! - Generated tones per cue, or configured audio files
//! - Non-blocking playback on a dedicated audio thread
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  crossbeam  ┌──────────────────┐
//! │    CueWorker     │────────────▶│  RodioCuePlayer  │
//! │ (CuePlayer impl) │             │  (audio thread)  │
//! └──────────────────┘             └────────┬─────────┘
//!                                           │
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │    CueSource     │
//!                                  │  file │ tone     │
//!                                  └──────────────────┘
//! ```
//!
//! The clock never plays audio itself; the sync adapter asks a
//! [`CuePlayer`] for a cue when a threshold fires on a non-silent run.

mod error;
mod player;
mod source;
mod worker;

use std::sync::Arc;

pub use error::SoundError;
pub use player::RodioCuePlayer;
pub use source::{cue_source, default_tone, validate_cue_files, CueSource};
pub use worker::CueWorker;

use crate::clock::Threshold;

/// One of the three distinct warning sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    InitialWarning,
    FinalWarning,
    TimeOver,
}

impl Cue {
    /// Every cue, in threshold order.
    pub const ALL: [Cue; 3] = [Cue::InitialWarning, Cue::FinalWarning, Cue::TimeOver];

    /// Returns the string representation of the cue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::InitialWarning => "initial_warning",
            Cue::FinalWarning => "final_warning",
            Cue::TimeOver => "time_over",
        }
    }
}

impl From<Threshold> for Cue {
    fn from(threshold: Threshold) -> Self {
        match threshold {
            Threshold::InitialWarning => Cue::InitialWarning,
            Threshold::FinalWarning => Cue::FinalWarning,
            Threshold::TimeOver => Cue::TimeOver,
        }
    }
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for cue playback implementations.
///
/// This trait abstracts cue playback, allowing for different
/// implementations (e.g., the audio thread, mock for testing).
pub trait CuePlayer {
    /// Requests playback of `cue`.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered.
    fn play(&self, cue: Cue) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;

    /// Returns true if cue playback is disabled.
    fn is_disabled(&self) -> bool;
}

impl<T: CuePlayer + ?Sized> CuePlayer for Arc<T> {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        (**self).play(cue)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// Mock cue player for testing.
#[derive(Debug, Default)]
pub struct MockCuePlayer {
    play_calls: std::sync::Mutex<Vec<Cue>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockCuePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Cue> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl CuePlayer for MockCuePlayer {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(cue);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_disabled(&self) -> bool {
        false
    }
}
