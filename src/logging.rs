//! Log output set-up.
//!
//! The terminal belongs to the game screen while it runs, so logs are only collected when a file is
//! named for them.

use std::{fs::File, path::Path, sync::Mutex};

use color_eyre::eyre::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "darkmaze=info";

/// Installs a global subscriber writing plain-text logs to `path`.
///
/// The file is created or truncated. Verbosity follows `RUST_LOG` when set.
///
/// # Errors
///
/// This function returns an error if the file cannot be created or a global subscriber is already
/// installed.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(path = %path.display(), "logging initialised");

    Ok(())
}
