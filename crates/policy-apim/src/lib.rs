//! Azure API Management accessor
//!
//! [`ApimClient`] implements [`policy_core::PolicyAccessor`] over the Azure
//! Resource Manager REST API using a pre-acquired bearer token.

pub mod client;
pub mod config;
pub mod error;

pub use client::ApimClient;
pub use config::{ApimConfig, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
pub use error::{Error, Result};
