//! Cue sources.
//!
//! Each cue plays a configured audio file when one is set, and a generated
//! tone otherwise.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::SoundError;
use super::Cue;
use crate::types::CueFiles;

/// Where the audio for a cue comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CueSource {
    /// An audio file on disk.
    File {
        /// Path to the file.
        path: PathBuf,
    },
    /// A generated sine tone.
    Tone {
        frequency_hz: f32,
        duration: Duration,
    },
}

impl CueSource {
    /// Creates a file cue source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a tone cue source.
    #[must_use]
    pub fn tone(frequency_hz: f32, duration: Duration) -> Self {
        Self::Tone {
            frequency_hz,
            duration,
        }
    }

    /// Returns true if this is a file source.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Tone { .. } => None,
        }
    }
}

/// Built-in tone for a cue. Urgency rises with pitch; time-over is long.
#[must_use]
pub fn default_tone(cue: Cue) -> CueSource {
    match cue {
        Cue::InitialWarning => CueSource::tone(660.0, Duration::from_millis(300)),
        Cue::FinalWarning => CueSource::tone(880.0, Duration::from_millis(600)),
        Cue::TimeOver => CueSource::tone(440.0, Duration::from_millis(1500)),
    }
}

/// Resolves the source for a cue, preferring a configured file.
#[must_use]
pub fn cue_source(cue: Cue, files: &CueFiles) -> CueSource {
    let configured = match cue {
        Cue::InitialWarning => files.initial_warning.as_ref(),
        Cue::FinalWarning => files.final_warning.as_ref(),
        Cue::TimeOver => files.time_over.as_ref(),
    };

    match configured {
        Some(path) => CueSource::file(path.clone()),
        None => default_tone(cue),
    }
}

/// Checks that every configured cue file exists.
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` for the first missing file.
pub fn validate_cue_files(files: &CueFiles) -> Result<(), SoundError> {
    for path in [&files.initial_warning, &files.final_warning, &files.time_over]
        .into_iter()
        .flatten()
    {
        if !path.is_file() {
            return Err(SoundError::FileNotFound(path.display().to_string()));
        }
    }
    Ok(())
}
