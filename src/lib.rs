//! Sensor Recorder Core - settings and export logic for multi-device sensor
//! recording.
//!
//! Given the sensor modules reported by a group of devices, this crate works
//! out which streams and options every device can honour, keeps the user's
//! selection consistent, builds per-device configurations, persists presets
//! and logging tokens across a local and a synced store, and serializes the
//! export of recorded sessions through a single dialog.

pub mod config;
pub mod device;
pub mod export;
pub mod parameters;
pub mod persistence;
pub mod settings;
pub mod utils;

pub use config::CoreConfig;
pub use utils::error::{AppError, AppResult, ErrorResponse};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default tracing subscriber.
///
/// Reads the filter from `RUST_LOG`. Does nothing if the host already
/// installed a global subscriber.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensor_recorder_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_ok() {
        tracing::info!("Sensor Recorder Core v{}", env!("CARGO_PKG_VERSION"));
    }
}
