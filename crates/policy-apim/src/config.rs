//! Connection settings for an API Management service

use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_API_VERSION: &str = "2022-08-01";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifies one API Management service and how to reach it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApimConfig {
    pub endpoint: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub service_name: String,
    pub api_version: String,
    /// Bearer token for the management endpoint
    pub access_token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApimConfig {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        service_name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            service_name: service_name.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check that every identifying setting is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("endpoint", &self.endpoint),
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("service_name", &self.service_name),
            ("api_version", &self.api_version),
            ("access_token", &self.access_token),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(Error::MissingSetting(name)),
            None => Ok(()),
        }
    }

    /// Resource URL of the service, without query parameters
    pub fn service_url(&self) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ApiManagement/service/{}",
            self.endpoint.trim_end_matches('/'),
            self.subscription_id,
            self.resource_group,
            self.service_name
        )
    }
}
