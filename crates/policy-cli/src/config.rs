//! Settings merged from the config file and the command line

use std::path::{Path, PathBuf};
use std::time::Duration;

use policy_apim::ApimConfig;
use policy_core::SyncOptions;
use policy_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Every setting the CLI understands, all optional until resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub subscription_id: Option<String>,
    pub resource_group: Option<String>,
    pub service_name: Option<String>,
    pub access_token: Option<String>,
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
    pub policies_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl SyncConfig {
    /// Load a config file; the format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Layer `overrides` on top of `self`; set values in `overrides` win.
    pub fn merge(self, overrides: SyncConfig) -> SyncConfig {
        SyncConfig {
            subscription_id: overrides.subscription_id.or(self.subscription_id),
            resource_group: overrides.resource_group.or(self.resource_group),
            service_name: overrides.service_name.or(self.service_name),
            access_token: overrides.access_token.or(self.access_token),
            endpoint: overrides.endpoint.or(self.endpoint),
            api_version: overrides.api_version.or(self.api_version),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            policies_dir: overrides.policies_dir.or(self.policies_dir),
            manifest: overrides.manifest.or(self.manifest),
        }
    }

    /// Discovery settings. The manifest path is used as given.
    pub fn sync_options(&self) -> SyncOptions {
        let base_dir = self
            .policies_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let options = SyncOptions::new(base_dir);
        match &self.manifest {
            Some(manifest) => options.with_manifest(manifest.clone()),
            None => options,
        }
    }

    /// Service settings, failing on the first missing required value.
    pub fn apim_config(&self) -> Result<ApimConfig> {
        let subscription_id = required(&self.subscription_id, "--subscription-id", "AZURE_SUBSCRIPTION_ID")?;
        let resource_group = required(&self.resource_group, "--resource-group", "AZURE_RESOURCE_GROUP")?;
        let service_name = required(&self.service_name, "--service-name", "APIM_SERVICE_NAME")?;
        let access_token = required(&self.access_token, "--access-token", "AZURE_ACCESS_TOKEN")?;

        let mut config = ApimConfig::new(subscription_id, resource_group, service_name, access_token);
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        if let Some(api_version) = &self.api_version {
            config = config.with_api_version(api_version);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

fn required<'a>(value: &'a Option<String>, flag: &str, env: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CliError::user(format!(
            "Missing required setting {} (or {} / config file)",
            flag, env
        ))),
    }
}
