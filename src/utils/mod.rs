use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Once,
};

use crate::errors::WizardResult;

/// Filter used when neither `RUST_LOG` nor the configuration provides one.
pub const DEFAULT_LOG_FILTER: &str = "wizard_core=info";

const DEFAULT_DIR_NAME: &str = ".wizard_core";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber. `RUST_LOG` takes precedence
/// over `filter`; a subscriber installed elsewhere is left in place.
pub fn init_tracing(filter: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Returns the application data directory, defaulting to `~/.wizard_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("WIZARD_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> WizardResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
