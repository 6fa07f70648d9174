//! Notification error types.

use thiserror::Error;

/// Errors raised while delivering a notification to the server.
///
/// Delivery is best-effort; callers log these and move on.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The notification channel has no receiver.
    #[error("通知チャネルが閉じられています")]
    ChannelClosed,

    /// The server socket could not be reached.
    #[error("サーバーに接続できません: {0}")]
    Unreachable(String),

    /// Writing the notification failed.
    #[error("通知の送信に失敗しました: {0}")]
    WriteError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,
}
