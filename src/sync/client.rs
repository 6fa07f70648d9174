//! Outbound notification client.
//!
//! This module provides:
//! - Unix Domain Socket client that writes one JSON notification per
//!   connection to the server
//! - The forwarding task that drains the notification channel
//!
//! Notifications are fire-and-forget. A failed delivery is logged and the
//! notification is dropped, never retried.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::error::NotifyError;
use crate::types::ServerNotification;

// ============================================================================
// Constants
// ============================================================================

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 2;

/// Write timeout in seconds
const WRITE_TIMEOUT_SECS: u64 = 2;

// ============================================================================
// NotificationClient
// ============================================================================

/// Client that delivers notifications to the server's socket.
#[derive(Debug, Clone)]
pub struct NotificationClient {
    /// Server socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
}

impl NotificationClient {
    /// Creates a client for the given server socket.
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or the write fails.
    pub async fn send(&self, notification: &ServerNotification) -> Result<(), NotifyError> {
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .map_err(|_| NotifyError::Timeout)?
            .map_err(|e| NotifyError::Unreachable(e.to_string()))?;

        let json = serde_json::to_vec(notification)
            .map_err(|e| NotifyError::SerializationError(e.to_string()))?;

        timeout(Duration::from_secs(WRITE_TIMEOUT_SECS), async {
            stream.write_all(&json).await?;
            stream.flush().await
        })
        .await
        .map_err(|_| NotifyError::Timeout)?
        .map_err(|e| NotifyError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Drains the notification channel until every sender is dropped.
///
/// Without a client, notifications are only logged.
pub async fn forward_notifications(
    mut rx: mpsc::UnboundedReceiver<ServerNotification>,
    client: Option<NotificationClient>,
) {
    while let Some(notification) = rx.recv().await {
        match &client {
            Some(client) => match client.send(&notification).await {
                Ok(()) => debug!(?notification, "notification delivered"),
                Err(e) => warn!(?notification, "notification dropped: {}", e),
            },
            None => info!(?notification, "notification (no server socket configured)"),
        }
    }
    debug!("notification channel closed");
}

// ============================================================================
// Tests
// ============================================================================
