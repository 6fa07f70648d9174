//! Cue player implementation using rodio.
//!
//! This module provides the `RodioCuePlayer` which uses the rodio v0.20
//! audio library. The output stream must stay on the thread that opened it,
//! so the player is owned by the audio thread in [`super::worker`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{cue_source, default_tone, CueSource};
use super::Cue;
use crate::types::CueFiles;

/// Amplitude applied to generated tones.
const TONE_VOLUME: f32 = 0.25;

/// A cue player that uses rodio for audio playback.
///
/// Playback is non-blocking; cues continue playing in the background.
pub struct RodioCuePlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether cue playback is disabled.
    disabled: bool,
    /// Configured cue file overrides.
    files: CueFiles,
}

impl RodioCuePlayer {
    /// Creates a new cue player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool, files: CueFiles) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled,
            files,
        })
    }

    /// Plays the audio for `cue`.
    ///
    /// A configured file that cannot be opened or decoded falls back to the
    /// built-in tone.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created or the fallback fails.
    pub fn play(&self, cue: Cue) -> Result<(), SoundError> {
        if self.disabled {
            debug!(%cue, "Cue playback disabled, skipping");
            return Ok(());
        }

        match cue_source(cue, &self.files) {
            CueSource::File { path } => match self.play_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.should_fallback_to_tone() => {
                    warn!(
                        "Failed to play cue file '{}': {}, falling back to tone",
                        path.display(),
                        e
                    );
                    self.play_source(default_tone(cue))
                }
                Err(e) => Err(e),
            },
            source => self.play_source(source),
        }
    }

    fn play_source(&self, source: CueSource) -> Result<(), SoundError> {
        match source {
            CueSource::File { path } => self.play_file(&path),
            CueSource::Tone {
                frequency_hz,
                duration,
            } => self.play_tone(frequency_hz, duration),
        }
    }

    /// Plays an audio file from the filesystem.
    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        sink.detach();

        debug!(path = %path.display(), "Cue file playback started (detached)");
        Ok(())
    }

    /// Plays a generated sine tone.
    fn play_tone(&self, frequency_hz: f32, duration: Duration) -> Result<(), SoundError> {
        let tone = SineWave::new(frequency_hz)
            .take_duration(duration)
            .amplify(TONE_VOLUME);

        let sink = self.new_sink()?;
        sink.append(tone);
        sink.detach();

        debug!(frequency_hz, "Cue tone playback started (detached)");
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    /// Returns true if cue playback is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl std::fmt::Debug for RodioCuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioCuePlayer")
            .field("disabled", &self.disabled)
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests return early in environments without audio hardware
    // (e.g., CI containers).

    #[test]
    fn test_disabled_player_skips_playback() {
        let player = match RodioCuePlayer::new(true, CueFiles::default()) {
            Ok(p) => p,
            Err(_) => return,
        };

        assert!(player.is_disabled());
        assert!(player.play(Cue::TimeOver).is_ok());
    }

    #[test]
    fn test_debug_impl() {
        let player = match RodioCuePlayer::new(true, CueFiles::default()) {
            Ok(p) => p,
            Err(_) => return,
        };

        let debug_str = format!("{:?}", player);
        assert!(debug_str.contains("RodioCuePlayer"));
    }

    #[test]
    fn test_missing_file_falls_back_to_tone() {
        let files = CueFiles {
            time_over: Some("/nonexistent/path/to/horn.wav".into()),
            ..CueFiles::default()
        };
        let player = match RodioCuePlayer::new(false, files) {
            Ok(p) => p,
            Err(_) => return,
        };

        // Sink creation may still fail on odd devices; it must not panic.
        let _ = player.play(Cue::TimeOver);
    }
}
