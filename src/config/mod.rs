use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::errors::{WizardError, WizardResult};
use crate::schema::{funding::funding_application, Schema};
use crate::submitters::HttpSubmitter;
use crate::utils::{app_data_dir, ensure_dir, DEFAULT_LOG_FILTER};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_endpoint: Option<String>,
    pub submit_timeout_secs: u64,
    pub log_filter: String,
    /// Schema JSON to use instead of the built-in funding application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_endpoint: None,
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
            log_filter: DEFAULT_LOG_FILTER.into(),
            schema_path: None,
        }
    }
}

impl Config {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn load_schema(&self) -> WizardResult<Arc<Schema>> {
        match &self.schema_path {
            Some(path) => Ok(Arc::new(Schema::load(path)?)),
            None => Ok(funding_application()),
        }
    }

    pub fn http_submitter(&self) -> WizardResult<HttpSubmitter> {
        let endpoint = self
            .submit_endpoint
            .as_deref()
            .ok_or_else(|| WizardError::Config("submit_endpoint is not set".into()))?;
        HttpSubmitter::new(endpoint, self.submit_timeout())
    }
}

/// Reads and writes `<base>/config/config.json`.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> WizardResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> WizardResult<Self> {
        let config_root = base.join(CONFIG_DIR);
        ensure_dir(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
        })
    }

    /// Defaults when no file has been written yet.
    pub fn load(&self) -> WizardResult<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> WizardResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> WizardResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
