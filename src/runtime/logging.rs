use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

/// Install the `tracing` subscriber writing to the configured log file.
///
/// The terminal belongs to the UI, so without a log file nothing is
/// installed and events are dropped. Returns whether a subscriber was set.
pub fn init_logging(settings: &LogSettings) -> Result<bool, Box<dyn std::error::Error>> {
    let Some(path) = settings.file.as_deref() else {
        return Ok(false);
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    Ok(true)
}
