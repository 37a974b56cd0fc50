//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SyncConfig;

/// Sync API Management policies from a repository to a live service
#[derive(Parser, Debug)]
#[command(name = "policy-sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (TOML, JSON or YAML) supplying any of the settings below
    #[arg(long, global = true, env = "POLICY_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// The command to run (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where the desired state is read from
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Directory containing `policies/` [default: .]
    #[arg(long, global = true, env = "POLICIES_DIR")]
    pub policies_dir: Option<PathBuf>,

    /// Manifest file to use instead of the directory convention
    #[arg(long, global = true, env = "POLICY_MANIFEST")]
    pub manifest: Option<PathBuf>,
}

/// Which service to sync against
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceArgs {
    #[arg(long, global = true, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    #[arg(long, global = true, env = "AZURE_RESOURCE_GROUP")]
    pub resource_group: Option<String>,

    /// API Management service name
    #[arg(long, global = true, env = "APIM_SERVICE_NAME")]
    pub service_name: Option<String>,

    /// Bearer token for the management endpoint
    #[arg(long, global = true, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Management endpoint [default: https://management.azure.com]
    #[arg(long, global = true, env = "AZURE_MANAGEMENT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Management API version [default: 2022-08-01]
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply every valid policy to the service and publish the last etag
    ///
    /// Examples:
    ///   policy-sync sync --policies-dir ./apim
    ///   policy-sync sync --manifest policy-manifest.yaml --strict
    Sync {
        /// Exit non-zero when any policy was rejected or failed
        #[arg(long)]
        strict: bool,
    },

    /// Discover and check policies without contacting the service
    Validate,
}

impl Cli {
    /// Settings given on the command line or through the environment
    pub fn overrides(&self) -> SyncConfig {
        SyncConfig {
            subscription_id: self.service.subscription_id.clone(),
            resource_group: self.service.resource_group.clone(),
            service_name: self.service.service_name.clone(),
            access_token: self.service.access_token.clone(),
            endpoint: self.service.endpoint.clone(),
            api_version: self.service.api_version.clone(),
            timeout_secs: self.service.timeout_secs,
            policies_dir: self.source.policies_dir.clone(),
            manifest: self.source.manifest.clone(),
        }
    }
}
