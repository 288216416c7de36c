//! # VR Edge
//!
//! Print `rising edge` / `falling edge` whenever the configured VR controller
//! button is clicked and released.
//!
//! # Usage
//!
//! ```bash
//! vr-edge                      # defaults: left joystick, demos/joystick_click.jsonl
//! vr-edge config/default.toml  # explicit configuration
//! ```
//!
//! Edge lines go to stdout; diagnostics go to stderr and honor `RUST_LOG`.

use anyhow::{Context, Result};
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use vr_edge::config::Config;
use vr_edge::controller::SessionState;
use vr_edge::event_log::EventLog;
use vr_edge::poller::PollLoop;
use vr_edge::vr::ReplaySystem;

/// Main entry point for VR Edge
///
/// # Control Flow
///
/// 1. Set up logging on stderr so stdout only carries edge lines
/// 2. Load configuration from the first argument, or use defaults
/// 3. Open the controller source and optional event log
/// 4. Poll until Ctrl+C
///
/// # Errors
///
/// Returns error if the configuration, recording or event log cannot be
/// loaded, or stdout becomes unwritable.
#[tokio::main]
async fn main() -> Result<()> {
    let (log_writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_writer)
        .init();

    info!("VR Edge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config {}", path.to_string_lossy()))?,
        None => {
            info!("No config file given, using defaults");
            Config::default()
        }
    };

    let role = config.role()?;
    let button = config.button()?;

    let replay = ReplaySystem::load(&config.replay.path, config.replay.loop_playback)
        .with_context(|| format!("Failed to load recording {}", config.replay.path.display()))?;

    let session = SessionState::new(replay)
        .with_dead_zone(config.dead_zone())
        .with_packet_tracking(config.packet_tracking());

    let mut poller = PollLoop::new(
        session,
        role,
        button,
        Duration::from_millis(config.poll.interval_ms),
    );

    if config.event_log.enabled {
        poller = poller.with_event_log(EventLog::open(&config.event_log.path)?);
    }

    info!("Press Ctrl+C to exit");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down...");
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    poller.run(&mut out, shutdown).await?;

    Ok(())
}
