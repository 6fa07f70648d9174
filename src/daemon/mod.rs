//! Daemon module for the attempt clock.
//!
//! This module contains the long-running clock service:
//! - `ipc`: Unix socket server receiving server commands
//! - `render`: Terminal renderer for foreground runs
//!
//! [`run`] wires the pieces together: one [`SyncAdapter`] behind a mutex,
//! shared by the IPC handler and the frame pump, with notifications
//! forwarded by a separate task.

pub mod ipc;
pub mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use render::TerminalRenderer;

use crate::clock::SystemTimeSource;
use crate::sound::{validate_cue_files, CueWorker};
use crate::sync::{forward_notifications, ChannelNotifier, NotificationClient, SyncAdapter};
use crate::types::ClockConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default socket path, relative to the home directory
const DEFAULT_SOCKET_PATH: &str = ".attempt-clock/clock.sock";

/// Returns the default IPC socket path.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("ホームディレクトリを取得できません")?;
    Ok(home.join(DEFAULT_SOCKET_PATH))
}

// ============================================================================
// DaemonConfig
// ============================================================================

/// Everything the daemon needs to run.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Clock configuration
    pub clock: ClockConfig,
    /// IPC socket the daemon listens on
    pub socket_path: PathBuf,
    /// Server socket receiving notifications
    pub notify_socket: Option<PathBuf>,
    /// Draw the clock on stdout
    pub render: bool,
}

// ============================================================================
// Runner
// ============================================================================

/// Runs the daemon until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the socket cannot be
/// bound.
pub async fn run(config: DaemonConfig) -> Result<()> {
    config
        .clock
        .validate()
        .context("時計の設定が不正です")?;

    if let Err(e) = validate_cue_files(&config.clock.cue_files) {
        warn!("{}; built-in tones will be used", e);
    }

    let cues = CueWorker::spawn(!config.clock.sounds_enabled, config.clock.cue_files.clone())
        .context("音声スレッドを起動できません")?;

    let (notifier, notifications) = ChannelNotifier::channel();
    let forwarder = tokio::spawn(forward_notifications(
        notifications,
        config.notify_socket.clone().map(NotificationClient::new),
    ));

    let mut adapter = SyncAdapter::new(
        &config.clock,
        Arc::new(SystemTimeSource),
        Box::new(notifier),
        Box::new(cues),
    )?;
    if config.render {
        adapter = adapter.with_renderer(Box::new(TerminalRenderer::stdout()));
    }
    let adapter = Arc::new(Mutex::new(adapter));

    let server = IpcServer::new(&config.socket_path)?;
    let handler = RequestHandler::new(adapter.clone());

    let mut pump = interval(Duration::from_millis(config.clock.frame_interval_ms));
    pump.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        socket = %server.socket_path().display(),
        mode = %config.clock.mode,
        start_value = config.clock.start_value,
        "daemon started"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = server.accept() => match accepted {
                Ok(stream) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, handler).await {
                            debug!("IPC connection failed: {:#}", e);
                        }
                    });
                }
                Err(e) => error!("{:#}", e),
            },
            _ = pump.tick() => {
                adapter.lock().await.pump_frames();
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // Dropping the adapter closes the notification channel and joins the
    // audio thread, which lets the forwarder drain and finish.
    drop(handler);
    if let Err(e) = tokio::task::spawn_blocking(move || drop(adapter)).await {
        warn!("Adapter shutdown ended abnormally: {}", e);
    }
    if let Err(e) = forwarder.await {
        warn!("Notification forwarder ended abnormally: {}", e);
    }

    info!("daemon stopped");
    Ok(())
}

async fn serve_connection(mut stream: tokio::net::UnixStream, handler: RequestHandler) -> Result<()> {
    let request = IpcServer::receive_request(&mut stream).await?;
    let response = handler.handle(request).await;
    IpcServer::send_response(&mut stream, &response).await
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
