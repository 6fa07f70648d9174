//! Server synchronization for the attempt clock.
//!
//! The [`SyncAdapter`] is the only place that knows about the server:
//!
//! - Applies inbound [`ClockCommand`]s to the [`Clock`]
//! - Pumps frames the clock has requested
//! - Routes [`ClockEvent`]s to the server notifier, the cue player and the
//!   renderer
//!
//! # Architecture
//!
//! ```text
//!  ClockCommand ──▶ ┌──────────────┐ ──▶ ServerNotifier (stopped, warnings)
//!                   │ SyncAdapter  │ ──▶ CuePlayer      (unless silent)
//!  FrameQueue   ──▶ │   └─ Clock   │ ──▶ ClockRenderer  (on change)
//!                   └──────────────┘
//! ```

pub mod client;
mod error;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

pub use client::{forward_notifications, NotificationClient};
pub use error::NotifyError;

use crate::clock::{Clock, ClockError, ClockEvent, FrameQueue, StopOrigin, TimeSource};
use crate::sound::{Cue, CuePlayer};
use crate::types::{ClockCommand, ClockConfig, ResponseData, ServerNotification};

// ============================================================================
// Collaborator traits
// ============================================================================

/// Delivers notifications to the authoritative server.
pub trait ServerNotifier {
    /// Sends `notification` without waiting for the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification cannot be queued or sent.
    fn notify(&self, notification: ServerNotification) -> Result<(), NotifyError>;
}

/// Receives the display text whenever it changes.
pub trait ClockRenderer {
    fn render(&mut self, text: &str);
}

/// Notifier that queues notifications for [`forward_notifications`].
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<ServerNotification>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver the forwarding task drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ServerNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ServerNotifier for ChannelNotifier {
    fn notify(&self, notification: ServerNotification) -> Result<(), NotifyError> {
        self.tx
            .send(notification)
            .map_err(|_| NotifyError::ChannelClosed)
    }
}

impl<T: ServerNotifier + ?Sized> ServerNotifier for Arc<T> {
    fn notify(&self, notification: ServerNotification) -> Result<(), NotifyError> {
        (**self).notify(notification)
    }
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockServerNotifier {
    sent: std::sync::Mutex<Vec<ServerNotification>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockServerNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<ServerNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl ServerNotifier for MockServerNotifier {
    fn notify(&self, notification: ServerNotification) -> Result<(), NotifyError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError::Unreachable("Mock failure".to_string()));
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

// ============================================================================
// SyncAdapter
// ============================================================================

/// Couples one [`Clock`] to the server, the cue player and a renderer.
pub struct SyncAdapter {
    clock: Clock,
    events: mpsc::UnboundedReceiver<ClockEvent>,
    frames: FrameQueue,
    notifier: Box<dyn ServerNotifier + Send>,
    cues: Box<dyn CuePlayer + Send>,
    renderer: Option<Box<dyn ClockRenderer + Send>>,
    last_rendered: Option<String>,
}

impl SyncAdapter {
    /// Creates an adapter owning a new clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(
        config: &ClockConfig,
        time: Arc<dyn TimeSource>,
        notifier: Box<dyn ServerNotifier + Send>,
        cues: Box<dyn CuePlayer + Send>,
    ) -> Result<Self, ClockError> {
        let (event_tx, events) = mpsc::unbounded_channel();
        let frames = FrameQueue::new();
        let clock = Clock::new(config, time, Box::new(frames.clone()), event_tx)?;

        Ok(Self {
            clock,
            events,
            frames,
            notifier,
            cues,
            renderer: None,
            last_rendered: None,
        })
    }

    /// Attaches a renderer and renders the current display once.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn ClockRenderer + Send>) -> Self {
        self.renderer = Some(renderer);
        self.last_rendered = None;
        self.render();
        self
    }

    /// Applies a server command.
    ///
    /// Events produced by the command are dispatched before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the command carries an invalid value.
    pub fn apply(&mut self, command: ClockCommand) -> Result<(), ClockError> {
        debug!(command = command.as_str(), "applying command");

        let result = match command {
            ClockCommand::Start {
                value,
                indefinite,
                silent,
            } => self.clock.start(value, indefinite, silent),
            ClockCommand::Pause {
                value,
                indefinite,
                silent,
            } => self.clock.pause(value, indefinite, silent),
            ClockCommand::Display { value, indefinite } => self.clock.display(value, indefinite),
            ClockCommand::Reset => {
                self.clock.reset();
                Ok(())
            }
            ClockCommand::Stop => {
                if !self.clock.stop_local() {
                    debug!("stop requested while not running");
                }
                Ok(())
            }
            ClockCommand::Configure { mode, start_value } => self.clock.configure(mode, start_value),
        };

        self.dispatch_events();
        self.render();
        result
    }

    /// Delivers every ready frame to the clock.
    ///
    /// Returns the number of frames the clock accepted.
    pub fn pump_frames(&mut self) -> usize {
        let accepted = self
            .frames
            .take_ready()
            .into_iter()
            .filter(|handle| self.clock.on_frame(*handle))
            .count();

        if accepted > 0 {
            trace!(accepted, "frames pumped");
            self.dispatch_events();
            self.render();
        }
        accepted
    }

    /// Returns the clock.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Returns the status reported to IPC clients.
    pub fn status(&self) -> ResponseData {
        ResponseData::from_timer_state(self.clock.state(), &self.clock.display_text())
    }

    fn dispatch_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.route(event);
        }
    }

    fn route(&self, event: ClockEvent) {
        match event {
            ClockEvent::Threshold { threshold, silent } => {
                self.notify(threshold.notification());
                if silent {
                    debug!(%threshold, "silent run, cue suppressed");
                } else {
                    self.play_cue(Cue::from(threshold));
                }
            }
            ClockEvent::Expired { value } => self.notify(ServerNotification::Stopped { value }),
            ClockEvent::Stopped {
                value,
                origin: StopOrigin::Local,
            } => self.notify(ServerNotification::Stopped { value }),
            ClockEvent::Stopped {
                value,
                origin: StopOrigin::Server,
            } => debug!(value, "server pause not echoed"),
        }
    }

    fn notify(&self, notification: ServerNotification) {
        if let Err(e) = self.notifier.notify(notification.clone()) {
            warn!(?notification, "Server notification dropped: {}", e);
        }
    }

    fn play_cue(&self, cue: Cue) {
        if self.cues.is_disabled() {
            debug!(%cue, "cues disabled");
            return;
        }
        if let Err(e) = self.cues.play(cue) {
            warn!(%cue, "Cue request failed: {}", e);
        }
    }

    fn render(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let text = self.clock.display_text();
        if self.last_rendered.as_deref() != Some(text.as_str()) {
            renderer.render(&text);
            self.last_rendered = Some(text);
        }
    }
}

impl std::fmt::Debug for SyncAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncAdapter")
            .field("clock", &self.clock)
            .field("last_rendered", &self.last_rendered)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::sound::MockCuePlayer;
    use crate::types::ClockMode;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingRenderer {
        frames: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingRenderer {
        fn rendered(&self) -> Vec<String> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl ClockRenderer for RecordingRenderer {
        fn render(&mut self, text: &str) {
            self.frames.lock().unwrap().push(text.to_string());
        }
    }

    struct Harness {
        adapter: SyncAdapter,
        time: Arc<ManualTimeSource>,
        notifier: Arc<MockServerNotifier>,
        cues: Arc<MockCuePlayer>,
        renderer: RecordingRenderer,
    }

    impl Harness {
        fn new(mode: ClockMode) -> Self {
            let time = Arc::new(ManualTimeSource::new());
            let notifier = Arc::new(MockServerNotifier::new());
            let cues = Arc::new(MockCuePlayer::new());
            let renderer = RecordingRenderer::default();
            let config = ClockConfig::default().with_mode(mode);

            let adapter = SyncAdapter::new(
                &config,
                time.clone(),
                Box::new(notifier.clone()),
                Box::new(cues.clone()),
            )
            .unwrap()
            .with_renderer(Box::new(renderer.clone()));

            Self {
                adapter,
                time,
                notifier,
                cues,
                renderer,
            }
        }

        fn tick(&mut self, seconds: f64) -> usize {
            self.time.advance_secs(seconds);
            self.adapter.pump_frames()
        }
    }

    fn start(value: f64, silent: bool) -> ClockCommand {
        ClockCommand::Start {
            value,
            indefinite: false,
            silent,
        }
    }

    // ------------------------------------------------------------------------
    // Notification routing
    // ------------------------------------------------------------------------

    mod routing_tests {
        use super::*;

        #[test]
        fn test_countdown_run_notifies_in_order() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(95.0, false)).unwrap();

            for _ in 0..200 {
                h.tick(0.5);
            }

            assert_eq!(
                h.notifier.sent(),
                vec![
                    ServerNotification::InitialWarning,
                    ServerNotification::FinalWarning,
                    ServerNotification::TimeOver,
                    ServerNotification::Stopped { value: 0.0 },
                ]
            );
            assert_eq!(
                h.cues.get_play_calls(),
                vec![Cue::InitialWarning, Cue::FinalWarning, Cue::TimeOver]
            );
        }

        #[test]
        fn test_silent_run_notifies_without_cues() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(31.0, true)).unwrap();

            for _ in 0..10 {
                h.tick(1.0);
            }

            assert!(h.notifier.sent().contains(&ServerNotification::FinalWarning));
            assert_eq!(h.cues.play_count(), 0);
        }

        #[test]
        fn test_server_pause_is_not_echoed() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(20.0, false)).unwrap();
            h.tick(2.0);

            h.adapter
                .apply(ClockCommand::Pause {
                    value: 18.0,
                    indefinite: false,
                    silent: false,
                })
                .unwrap();

            assert!(!h
                .notifier
                .sent()
                .iter()
                .any(|n| matches!(n, ServerNotification::Stopped { .. })));
            assert!(!h.adapter.clock().is_running());
        }

        #[test]
        fn test_local_stop_reports_value() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(20.0, false)).unwrap();
            h.tick(2.5);

            h.adapter.apply(ClockCommand::Stop).unwrap();

            assert_eq!(
                h.notifier.sent().last(),
                Some(&ServerNotification::Stopped { value: 17.5 })
            );
        }

        #[test]
        fn test_stop_while_idle_sends_nothing() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(ClockCommand::Stop).unwrap();

            assert!(h.notifier.sent().is_empty());
        }

        #[test]
        fn test_count_up_run_never_sends_time_over() {
            let mut h = Harness::new(ClockMode::CountUp);
            h.adapter.apply(start(0.0, false)).unwrap();

            for _ in 0..70 {
                h.tick(1.0);
            }

            assert_eq!(
                h.notifier.sent(),
                vec![
                    ServerNotification::FinalWarning,
                    ServerNotification::Stopped { value: 60.0 },
                ]
            );
        }
    }

    // ------------------------------------------------------------------------
    // Failure handling
    // ------------------------------------------------------------------------

    mod failure_tests {
        use super::*;

        #[test]
        fn test_notifier_failure_does_not_affect_clock() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.notifier.set_should_fail(true);

            h.adapter.apply(start(31.0, false)).unwrap();
            for _ in 0..4 {
                h.tick(1.0);
            }

            assert_eq!(h.adapter.clock().state().current_value, 27.0);
            assert!(h.adapter.clock().is_running());
            assert_eq!(h.cues.get_play_calls(), vec![Cue::FinalWarning]);
        }

        #[test]
        fn test_cue_failure_does_not_affect_notifications() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.cues.set_should_fail(true);

            h.adapter.apply(start(31.0, false)).unwrap();
            h.tick(1.5);

            assert_eq!(h.notifier.sent(), vec![ServerNotification::FinalWarning]);
        }

        #[test]
        fn test_invalid_command_value_is_rejected() {
            let mut h = Harness::new(ClockMode::Countdown);
            let result = h.adapter.apply(start(f64::NAN, false));

            assert!(result.unwrap_err().is_configuration_error());
            assert!(!h.adapter.clock().is_running());
        }

        #[test]
        fn test_channel_notifier_closed() {
            let (notifier, rx) = ChannelNotifier::channel();
            drop(rx);

            let result = notifier.notify(ServerNotification::TimeOver);
            assert!(matches!(result, Err(NotifyError::ChannelClosed)));
        }

        #[test]
        fn test_channel_notifier_delivers() {
            let (notifier, mut rx) = ChannelNotifier::channel();
            notifier.notify(ServerNotification::InitialWarning).unwrap();

            assert_eq!(rx.try_recv().unwrap(), ServerNotification::InitialWarning);
        }
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    mod render_tests {
        use super::*;

        #[test]
        fn test_initial_render_on_attach() {
            let h = Harness::new(ClockMode::Countdown);
            assert_eq!(h.renderer.rendered(), vec!["1:00".to_string()]);
        }

        #[test]
        fn test_render_only_on_change() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(10.0, false)).unwrap();

            h.tick(0.1);
            h.tick(0.1);
            h.tick(1.0);

            assert_eq!(
                h.renderer.rendered(),
                vec!["1:00".to_string(), "0:10".to_string(), "0:09".to_string()]
            );
        }

        #[test]
        fn test_indefinite_renders_placeholder() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter
                .apply(ClockCommand::Display {
                    value: 0.0,
                    indefinite: true,
                })
                .unwrap();

            assert_eq!(h.renderer.rendered().last().unwrap(), "--:--");
        }

        #[test]
        fn test_configure_renders_new_mode() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter
                .apply(ClockCommand::Configure {
                    mode: Some(ClockMode::CountUp),
                    start_value: Some(90.0),
                })
                .unwrap();

            assert_eq!(h.adapter.clock().base_mode(), ClockMode::CountUp);
            assert_eq!(h.renderer.rendered().last().unwrap(), "0:00");
            assert!(h.notifier.sent().is_empty());
        }

        #[test]
        fn test_configure_while_running_is_rejected() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(40.0, false)).unwrap();

            let result = h.adapter.apply(ClockCommand::Configure {
                mode: Some(ClockMode::CountUp),
                start_value: None,
            });

            assert_eq!(result, Err(ClockError::ModeSwitchWhileRunning));
            assert!(h.adapter.clock().is_running());
        }

        #[test]
        fn test_status_reflects_clock() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(125.0, false)).unwrap();

            let status = h.adapter.status();
            assert_eq!(status.mode.as_deref(), Some("countdown"));
            assert_eq!(status.display.as_deref(), Some("2:05"));
            assert_eq!(status.running, Some(true));
        }
    }

    // ------------------------------------------------------------------------
    // Frame pumping
    // ------------------------------------------------------------------------

    mod pump_tests {
        use super::*;

        #[test]
        fn test_pump_without_run_accepts_nothing() {
            let mut h = Harness::new(ClockMode::Countdown);
            assert_eq!(h.tick(1.0), 0);
        }

        #[test]
        fn test_restart_keeps_single_chain() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(50.0, false)).unwrap();
            h.adapter.apply(start(50.0, false)).unwrap();

            assert_eq!(h.tick(1.0), 1);
            assert_eq!(h.adapter.clock().state().current_value, 49.0);
        }

        #[test]
        fn test_pump_after_expiry_accepts_nothing() {
            let mut h = Harness::new(ClockMode::Countdown);
            h.adapter.apply(start(1.0, false)).unwrap();
            h.tick(2.0);

            assert!(!h.adapter.clock().is_running());
            assert_eq!(h.tick(1.0), 0);
        }
    }
}
