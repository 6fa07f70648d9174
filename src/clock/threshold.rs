//! Threshold watcher.
//!
//! Compares the remaining time against the warning thresholds after every
//! integration step. Each threshold fires at most once per run, guarded by
//! its flag in [`WarningFlags`].

use crate::types::{ClockMode, ServerNotification, WarningFlags};

/// Fires slightly early so the cue is heard on the boundary.
pub const CUE_LATENCY_SECS: f64 = 0.1;

/// Remaining seconds for the initial warning.
pub const INITIAL_WARNING_SECS: f64 = 90.0;

/// Remaining seconds for the final warning.
pub const FINAL_WARNING_SECS: f64 = 30.0;

/// A remaining-time boundary that triggers a one-time event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Threshold {
    FinalWarning,
    InitialWarning,
    TimeOver,
}

impl Threshold {
    /// Evaluation order.
    pub const PRECEDENCE: [Threshold; 3] = [
        Threshold::FinalWarning,
        Threshold::InitialWarning,
        Threshold::TimeOver,
    ];

    /// Remaining time at or below which the threshold fires.
    pub fn trigger_secs(&self) -> f64 {
        match self {
            Threshold::FinalWarning => FINAL_WARNING_SECS + CUE_LATENCY_SECS,
            Threshold::InitialWarning => INITIAL_WARNING_SECS + CUE_LATENCY_SECS,
            Threshold::TimeOver => CUE_LATENCY_SECS,
        }
    }

    /// Returns the string representation of the threshold.
    pub fn as_str(&self) -> &'static str {
        match self {
            Threshold::FinalWarning => "final_warning",
            Threshold::InitialWarning => "initial_warning",
            Threshold::TimeOver => "time_over",
        }
    }

    /// Notification reported to the server when the threshold fires.
    pub fn notification(&self) -> ServerNotification {
        match self {
            Threshold::FinalWarning => ServerNotification::FinalWarning,
            Threshold::InitialWarning => ServerNotification::InitialWarning,
            Threshold::TimeOver => ServerNotification::TimeOver,
        }
    }

    /// Returns true if the threshold applies in `mode`.
    ///
    /// Count-up runs end by reaching the start value and have no time-over.
    pub fn applies_to(&self, mode: ClockMode) -> bool {
        match mode {
            ClockMode::Countdown => true,
            ClockMode::CountUp => !matches!(self, Threshold::TimeOver),
            ClockMode::Indefinite => false,
        }
    }

    fn given(&self, flags: &WarningFlags) -> bool {
        match self {
            Threshold::FinalWarning => flags.final_warning_given,
            Threshold::InitialWarning => flags.initial_warning_given,
            Threshold::TimeOver => flags.time_over_given,
        }
    }

    fn mark(&self, flags: &mut WarningFlags) {
        match self {
            Threshold::FinalWarning => flags.final_warning_given = true,
            Threshold::InitialWarning => flags.initial_warning_given = true,
            Threshold::TimeOver => flags.time_over_given = true,
        }
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the warning flags of one clock.
#[derive(Debug, Clone, Default)]
pub struct ThresholdWatcher {
    flags: WarningFlags,
}

impl ThresholdWatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arms the flags for a run beginning with `remaining` seconds left.
    pub fn arm(&mut self, remaining: f64) {
        self.flags = WarningFlags::armed_for(remaining);
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        self.flags.clear();
    }

    /// Returns the current flags.
    pub fn flags(&self) -> WarningFlags {
        self.flags
    }

    /// Returns the thresholds crossed for the first time, in precedence
    /// order, and marks them as given.
    pub fn check(&mut self, mode: ClockMode, remaining: f64) -> Vec<Threshold> {
        let mut fired = Vec::new();
        for threshold in Threshold::PRECEDENCE {
            if !threshold.applies_to(mode) || threshold.given(&self.flags) {
                continue;
            }
            if remaining <= threshold.trigger_secs() {
                threshold.mark(&mut self.flags);
                fired.push(threshold);
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod threshold_tests {
        use super::*;

        #[test]
        fn test_trigger_secs_include_latency() {
            assert!((Threshold::FinalWarning.trigger_secs() - 30.1).abs() < 1e-9);
            assert!((Threshold::InitialWarning.trigger_secs() - 90.1).abs() < 1e-9);
            assert!((Threshold::TimeOver.trigger_secs() - 0.1).abs() < 1e-9);
        }

        #[test]
        fn test_notification_mapping() {
            assert_eq!(
                Threshold::InitialWarning.notification(),
                ServerNotification::InitialWarning
            );
            assert_eq!(
                Threshold::FinalWarning.notification(),
                ServerNotification::FinalWarning
            );
            assert_eq!(
                Threshold::TimeOver.notification(),
                ServerNotification::TimeOver
            );
        }

        #[test]
        fn test_applies_to() {
            assert!(Threshold::TimeOver.applies_to(ClockMode::Countdown));
            assert!(!Threshold::TimeOver.applies_to(ClockMode::CountUp));
            assert!(Threshold::FinalWarning.applies_to(ClockMode::CountUp));
            assert!(!Threshold::InitialWarning.applies_to(ClockMode::Indefinite));
        }
    }

    mod watcher_tests {
        use super::*;

        #[test]
        fn test_no_threshold_above_initial() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(120.0);
            assert!(watcher.check(ClockMode::Countdown, 95.0).is_empty());
        }

        #[test]
        fn test_initial_fires_once() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(120.0);

            assert_eq!(
                watcher.check(ClockMode::Countdown, 90.05),
                vec![Threshold::InitialWarning]
            );
            assert!(watcher.check(ClockMode::Countdown, 89.0).is_empty());
            assert!(watcher.flags().initial_warning_given);
        }

        #[test]
        fn test_large_step_fires_in_precedence_order() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(120.0);

            assert_eq!(
                watcher.check(ClockMode::Countdown, 0.0),
                vec![
                    Threshold::FinalWarning,
                    Threshold::InitialWarning,
                    Threshold::TimeOver
                ]
            );
        }

        #[test]
        fn test_armed_flags_do_not_fire_retroactively() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(45.0);

            assert!(watcher.check(ClockMode::Countdown, 44.0).is_empty());
            assert_eq!(
                watcher.check(ClockMode::Countdown, 30.0),
                vec![Threshold::FinalWarning]
            );
        }

        #[test]
        fn test_count_up_never_times_over() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(10.0);

            assert!(watcher.check(ClockMode::CountUp, 0.0).is_empty());
            assert!(!watcher.flags().time_over_given);
        }

        #[test]
        fn test_reset_rearms() {
            let mut watcher = ThresholdWatcher::new();
            watcher.arm(5.0);
            assert!(watcher.flags().final_warning_given);

            watcher.reset();
            assert_eq!(watcher.flags(), WarningFlags::default());
            assert_eq!(
                watcher.check(ClockMode::Countdown, 20.0),
                vec![Threshold::FinalWarning, Threshold::InitialWarning]
            );
        }
    }
}
