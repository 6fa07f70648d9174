//! Clock driver.
//!
//! This module provides the core clock functionality:
//! - Elapsed-time integration from a monotonic time source
//! - One pending frame at a time, revoked on every stop
//! - Threshold evaluation after each step
//! - Terminal detection and snapping for countdown and count-up runs

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use super::error::ClockError;
use super::format::{format_time, INDEFINITE_PLACEHOLDER};
use super::frame::{FrameHandle, FrameScheduler};
use super::source::{elapsed_secs, TimeSource};
use super::threshold::{Threshold, ThresholdWatcher};
use crate::types::{
    ensure_finite, validate_start_value, ClockConfig, ClockMode, ConfigurationError, TimerState,
    WarningFlags,
};

// ============================================================================
// ClockEvent
// ============================================================================

/// Who caused a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOrigin {
    /// The server commanded the stop
    Server,
    /// The stop happened on the client (user action or expiry)
    Local,
}

/// Events emitted by the clock for the sync adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    /// A warning threshold was crossed
    Threshold {
        threshold: Threshold,
        /// Local audio cues are suppressed for this run
        silent: bool,
    },
    /// The run reached its terminal value and stopped itself
    Expired {
        /// Terminal value the clock snapped to
        value: f64,
    },
    /// The clock was stopped by a pause or a local stop
    Stopped {
        /// Value the client had computed when it stopped
        value: f64,
        origin: StopOrigin,
    },
}

// ============================================================================
// Clock
// ============================================================================

/// Countdown/count-up clock driven by frame callbacks.
pub struct Clock {
    /// Mode used for non-indefinite runs
    base_mode: ClockMode,
    /// Current timer state
    state: TimerState,
    /// Warning flags for the current run
    watcher: ThresholdWatcher,
    /// Timestamp of the last integration step
    anchor: Option<Instant>,
    /// The only frame this clock will accept
    pending: Option<FrameHandle>,
    time: Arc<dyn TimeSource>,
    frames: Box<dyn FrameScheduler>,
    event_tx: mpsc::UnboundedSender<ClockEvent>,
}

impl Clock {
    /// Creates a stopped clock from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(
        config: &ClockConfig,
        time: Arc<dyn TimeSource>,
        frames: Box<dyn FrameScheduler>,
        event_tx: mpsc::UnboundedSender<ClockEvent>,
    ) -> Result<Self, ClockError> {
        config.validate()?;

        Ok(Self {
            base_mode: config.mode,
            state: TimerState::new(config.mode, config.start_value),
            watcher: ThresholdWatcher::new(),
            anchor: None,
            pending: None,
            time,
            frames,
            event_tx,
        })
    }

    // ------------------------------------------------------------------------
    // Control operations
    // ------------------------------------------------------------------------

    /// Starts a run from `seconds`.
    ///
    /// Any pending frame from a previous run is revoked first, so repeated
    /// starts never stack integration chains.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is not finite.
    pub fn start(&mut self, seconds: f64, indefinite: bool, silent: bool) -> Result<(), ClockError> {
        let seconds = ensure_finite(seconds)?;
        self.halt();
        self.state.silent = silent;

        if indefinite {
            self.show_indefinite();
            return Ok(());
        }

        self.state.mode = self.base_mode;
        self.state.current_value = seconds;
        self.watcher.arm(self.state.remaining());

        if self.state.is_terminal() {
            debug!(seconds, "timer already over at start");
            self.state.current_value = self.state.terminal_value();
        } else {
            self.state.current_value = self.state.clamp(seconds);
        }

        self.fire_thresholds();

        self.anchor = Some(self.time.now());
        self.state.running = true;
        self.pending = Some(self.frames.request_frame());

        info!(
            mode = %self.state.mode,
            value = self.state.current_value,
            silent,
            "clock started"
        );
        Ok(())
    }

    /// Stops the clock at the server-supplied `seconds`.
    ///
    /// Emits [`ClockEvent::Stopped`] with the value the client had computed,
    /// which may differ from `seconds`.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is not finite.
    pub fn pause(&mut self, seconds: f64, indefinite: bool, silent: bool) -> Result<(), ClockError> {
        let seconds = ensure_finite(seconds)?;
        let observed = self.observed_value();
        self.halt();
        self.state.silent = silent;

        if indefinite {
            self.show_indefinite();
        } else {
            self.state.mode = self.base_mode;
            self.state.current_value = self.state.clamp(seconds);
        }

        info!(
            value = self.state.current_value,
            observed, "clock paused by server"
        );
        self.emit(ClockEvent::Stopped {
            value: observed,
            origin: StopOrigin::Server,
        });
        Ok(())
    }

    /// Shows `seconds` without running and re-arms every warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is not finite.
    pub fn display(&mut self, seconds: f64, indefinite: bool) -> Result<(), ClockError> {
        let seconds = ensure_finite(seconds)?;
        self.halt();
        self.watcher.reset();

        if indefinite {
            self.show_indefinite();
        } else {
            self.state.mode = self.base_mode;
            self.state.current_value = self.state.clamp(seconds);
        }

        debug!(display = %self.display_text(), "clock display updated");
        Ok(())
    }

    /// Returns to the configured start value for the base mode.
    pub fn reset(&mut self) {
        self.halt();
        self.watcher.reset();
        self.state.mode = self.base_mode;
        self.state.silent = false;
        self.state.current_value = self.state.initial_value();

        debug!(value = self.state.current_value, "clock reset");
    }

    /// Stops a running clock at its locally computed value.
    ///
    /// Returns `false` if the clock was not running.
    pub fn stop_local(&mut self) -> bool {
        if !self.state.running {
            return false;
        }

        let value = self.observed_value();
        self.halt();
        self.state.current_value = value;

        info!(value, "clock stopped locally");
        self.emit(ClockEvent::Stopped {
            value,
            origin: StopOrigin::Local,
        });
        true
    }

    /// Changes the base mode.
    ///
    /// The clock shows the initial value of the new mode afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error while running, or if `mode` is indefinite.
    pub fn set_mode(&mut self, mode: ClockMode) -> Result<(), ClockError> {
        if self.state.running {
            return Err(ClockError::ModeSwitchWhileRunning);
        }
        if !mode.integrates() {
            return Err(ConfigurationError::IndefiniteBaseMode.into());
        }

        self.base_mode = mode;
        self.state.mode = mode;
        self.state.current_value = self.state.initial_value();
        self.watcher.reset();
        Ok(())
    }

    /// Changes the configured start value.
    ///
    /// # Errors
    ///
    /// Returns an error while running, or if `seconds` is negative or not
    /// finite.
    pub fn set_start_value(&mut self, seconds: f64) -> Result<(), ClockError> {
        if self.state.running {
            return Err(ClockError::StartValueChangeWhileRunning);
        }
        validate_start_value(seconds)?;

        self.state.start_value = seconds;
        self.state.current_value = self.state.clamp(self.state.current_value);
        Ok(())
    }

    /// Applies a start value and then a mode change, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Clock::set_start_value`] or
    /// [`Clock::set_mode`] would return; nothing changes in that case.
    pub fn configure(
        &mut self,
        mode: Option<ClockMode>,
        start_value: Option<f64>,
    ) -> Result<(), ClockError> {
        if self.state.running {
            return Err(if mode.is_some() {
                ClockError::ModeSwitchWhileRunning
            } else {
                ClockError::StartValueChangeWhileRunning
            });
        }
        if let Some(seconds) = start_value {
            validate_start_value(seconds)?;
        }
        if mode.is_some_and(|mode| !mode.integrates()) {
            return Err(ConfigurationError::IndefiniteBaseMode.into());
        }

        if let Some(seconds) = start_value {
            self.set_start_value(seconds)?;
        }
        if let Some(mode) = mode {
            self.set_mode(mode)?;
        }

        info!(mode = %self.base_mode, start_value = self.state.start_value, "clock configured");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Frame integration
    // ------------------------------------------------------------------------

    /// Integration step, called by the host when a requested frame fires.
    ///
    /// Returns `false` and does nothing if `handle` is not the pending frame,
    /// which happens for frames requested by a run that has since stopped.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) || !self.state.running {
            trace!(frame = handle.id(), "stale frame ignored");
            return false;
        }
        self.pending = None;

        let now = self.time.now();
        let delta = self.anchor.map_or(0.0, |anchor| elapsed_secs(anchor, now));
        self.anchor = Some(now);
        self.state.advance(delta);

        self.fire_thresholds();

        if self.state.is_terminal() {
            self.state.current_value = self.state.terminal_value();
            self.state.running = false;
            self.anchor = None;

            info!(value = self.state.current_value, "clock expired");
            self.emit(ClockEvent::Expired {
                value: self.state.current_value,
            });
        } else {
            self.pending = Some(self.frames.request_frame());
        }
        true
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the warning flags of the current run.
    pub fn flags(&self) -> WarningFlags {
        self.watcher.flags()
    }

    /// Returns the mode used for non-indefinite runs.
    pub fn base_mode(&self) -> ClockMode {
        self.base_mode
    }

    /// Returns true while frame integration is active.
    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Seconds left before the terminal value, as of the last step.
    pub fn remaining(&self) -> f64 {
        self.state.remaining()
    }

    /// Returns the frame this clock is waiting for, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Returns the text to render for the current value.
    pub fn display_text(&self) -> String {
        if self.state.mode == ClockMode::Indefinite {
            INDEFINITE_PLACEHOLDER.to_string()
        } else {
            format_time(self.state.current_value)
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Revokes the pending frame and stops integration.
    fn halt(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        self.state.running = false;
        self.anchor = None;
    }

    fn show_indefinite(&mut self) {
        self.state.mode = ClockMode::Indefinite;
        self.watcher.reset();
    }

    /// Current value integrated up to now, without mutating state.
    fn observed_value(&self) -> f64 {
        if !self.state.running {
            return self.state.current_value;
        }

        let mut projected = self.state.clone();
        if let Some(anchor) = self.anchor {
            projected.advance(elapsed_secs(anchor, self.time.now()));
        }
        if projected.is_terminal() {
            projected.terminal_value()
        } else {
            projected.current_value
        }
    }

    fn fire_thresholds(&mut self) {
        let remaining = self.state.remaining();
        for threshold in self.watcher.check(self.state.mode, remaining) {
            info!(%threshold, remaining, "warning threshold reached");
            self.emit(ClockEvent::Threshold {
                threshold,
                silent: self.state.silent,
            });
        }
    }

    fn emit(&self, event: ClockEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("clock event receiver dropped");
        }
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("base_mode", &self.base_mode)
            .field("state", &self.state)
            .field("flags", &self.watcher.flags())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
