//! Clock error types.

use thiserror::Error;

use crate::types::ConfigurationError;

/// Errors returned by clock control operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockError {
    /// A value or configuration broke the contract.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The mode cannot change during a run.
    #[error("タイマー実行中はモードを変更できません")]
    ModeSwitchWhileRunning,

    /// The start value cannot change during a run.
    #[error("タイマー実行中は開始時間を変更できません")]
    StartValueChangeWhileRunning,
}

impl ClockError {
    /// Returns true if the error indicates a server-side contract violation.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
