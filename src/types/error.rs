//! Configuration error types.
//!
//! A configuration error always means the caller (usually the server pushing
//! commands) broke the contract, so values are rejected rather than clamped.

use thiserror::Error;

/// Errors raised when a clock configuration or command value is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The configured start value is negative.
    #[error("開始時間に負の値は指定できません: {0}")]
    NegativeStartValue(f64),

    /// A time value is NaN or infinite.
    #[error("時間の値が不正です: {0}")]
    NonFiniteValue(f64),

    /// The mode string does not name a known mode.
    #[error("不明なモードです: {0}")]
    UnknownMode(String),

    /// Indefinite is a per-command display state, not a base mode.
    #[error("無制限モードは基本モードとして指定できません")]
    IndefiniteBaseMode,

    /// The frame interval must be at least one millisecond.
    #[error("フレーム間隔は1ミリ秒以上で指定してください")]
    InvalidFrameInterval,
}

impl ConfigurationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NegativeStartValue(_) => "0以上の秒数を指定してください",
            Self::NonFiniteValue(_) => "有限の秒数を指定してください",
            Self::UnknownMode(_) => "countdown または count-up を指定してください",
            Self::IndefiniteBaseMode => "無制限表示はコマンドの indefinite フラグで指定してください",
            Self::InvalidFrameInterval => "16 (約60fps) 程度の値を指定してください",
        }
    }
}

/// Rejects NaN and infinite time values.
pub fn ensure_finite(value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFiniteValue(value))
    }
}
