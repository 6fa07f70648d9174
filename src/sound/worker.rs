//! Dedicated audio thread.
//!
//! The rodio output stream cannot move between threads, so one OS thread
//! owns the [`RodioCuePlayer`] and receives cues over a crossbeam channel.
//! [`CueWorker`] is the `Send` handle the rest of the daemon talks to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use super::error::SoundError;
use super::player::RodioCuePlayer;
use super::{Cue, CuePlayer};
use crate::types::CueFiles;

/// Handle to the audio thread.
pub struct CueWorker {
    tx: Option<Sender<Cue>>,
    available: Arc<AtomicBool>,
    disabled: bool,
    handle: Option<JoinHandle<()>>,
}

impl CueWorker {
    /// Starts the audio thread.
    ///
    /// Audio device problems do not fail this call; the thread logs them and
    /// drops every cue it receives.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::WorkerSpawn` if the thread cannot be created.
    pub fn spawn(disabled: bool, files: CueFiles) -> Result<Self, SoundError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let available = Arc::new(AtomicBool::new(false));
        let thread_available = available.clone();

        let handle = std::thread::Builder::new()
            .name("audio-cues".to_string())
            .spawn(move || run_worker(rx, disabled, files, thread_available))
            .map_err(|e| SoundError::WorkerSpawn(e.to_string()))?;

        Ok(Self {
            tx: Some(tx),
            available,
            disabled,
            handle: Some(handle),
        })
    }
}

fn run_worker(rx: Receiver<Cue>, disabled: bool, files: CueFiles, available: Arc<AtomicBool>) {
    let player = match RodioCuePlayer::new(disabled, files) {
        Ok(player) => {
            available.store(true, Ordering::SeqCst);
            Some(player)
        }
        Err(e) if e.is_device_error() => {
            warn!("No audio output device, cues disabled: {}", e);
            None
        }
        Err(e) => {
            warn!("Audio not available, cues disabled: {}", e);
            None
        }
    };

    for cue in rx.iter() {
        match &player {
            Some(player) => {
                if let Err(e) = player.play(cue) {
                    warn!(%cue, "Cue playback failed: {}", e);
                }
            }
            None => debug!(%cue, "Audio unavailable, cue dropped"),
        }
    }

    debug!("Audio thread finished");
}

impl CuePlayer for CueWorker {
    fn play(&self, cue: Cue) -> Result<(), SoundError> {
        match &self.tx {
            Some(tx) => tx.send(cue).map_err(|_| SoundError::ChannelClosed),
            None => Err(SoundError::ChannelClosed),
        }
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Drop for CueWorker {
    fn drop(&mut self) {
        // Closing the channel ends the thread's receive loop.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for CueWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueWorker")
            .field("available", &self.is_available())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
