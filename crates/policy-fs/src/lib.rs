//! Filesystem layer for APIM Policy Sync
//!
//! Provides separator-agnostic path handling, text reads, recursive file
//! enumeration and format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::FileListing;
pub use path::NormalizedPath;
