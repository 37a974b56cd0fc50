//! Shared test utilities for the apim-policy-sync workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild policy trees and fake services. It is a dev-dependency only
//! and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`PolicyTree`] builder for temporary policy repositories
//! - [`accessor`]: [`ScriptedAccessor`], an in-memory API Management service

pub mod accessor;
pub mod tree;

pub use accessor::{ScriptedAccessor, WriteCall};
pub use tree::PolicyTree;

/// A policy body that passes the content check
pub const VALID_POLICY: &str = "<policies>\n  <inbound>\n    <base />\n  </inbound>\n  <backend>\n    <base />\n  </backend>\n  <outbound>\n    <base />\n  </outbound>\n  <on-error>\n    <base />\n  </on-error>\n</policies>\n";
