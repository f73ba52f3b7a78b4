//! Service endpoint configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Where the remote services live. Injected at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoints {
    /// Workspace (object storage) JSON-RPC endpoint.
    pub workspace_url: String,
    /// Service wizard used to look up the set service URL.
    pub service_wizard_url: String,
    /// Release tag passed to the service wizard (`release`, `beta`, `dev`).
    #[serde(default = "default_set_api_version")]
    pub set_api_version: String,
    /// Fixed set service URL; skips the service wizard lookup when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_set_api_version() -> String {
    "release".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl ServiceEndpoints {
    pub fn new(workspace_url: impl Into<String>, service_wizard_url: impl Into<String>) -> Self {
        Self {
            workspace_url: workspace_url.into(),
            service_wizard_url: service_wizard_url.into(),
            set_api_version: default_set_api_version(),
            set_api_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read endpoints from `SETVIEW_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            get(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{} is not set", key)))
        };

        let mut endpoints = Self::new(
            required("SETVIEW_WORKSPACE_URL")?,
            required("SETVIEW_SERVICE_WIZARD_URL")?,
        );
        if let Some(version) = get("SETVIEW_SET_API_VERSION") {
            endpoints.set_api_version = version;
        }
        endpoints.set_api_url = get("SETVIEW_SET_API_URL").filter(|v| !v.is_empty());
        if let Some(secs) = get("SETVIEW_TIMEOUT_SECS") {
            endpoints.timeout_secs = secs
                .parse()
                .map_err(|_| Error::Config(format!("SETVIEW_TIMEOUT_SECS '{}' is not a number", secs)))?;
        }

        endpoints.validate()?;
        Ok(endpoints)
    }

    /// Load endpoints from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let endpoints: Self = serde_json::from_str(&data)?;
        endpoints.validate()?;
        debug!("Loaded service endpoints from {}", path.display());
        Ok(endpoints)
    }

    /// Save endpoints to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut urls = vec![
            ("workspaceUrl", self.workspace_url.as_str()),
            ("serviceWizardUrl", self.service_wizard_url.as_str()),
        ];
        if let Some(url) = &self.set_api_url {
            urls.push(("setApiUrl", url.as_str()));
        }
        for (field, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if self.set_api_version.is_empty() {
            return Err(Error::Config("setApiVersion must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeoutSecs must be positive".into()));
        }
        Ok(())
    }
}
