//! Directory-convention discovery strategy

use policy_fs::io;

use super::{DiscoveryReport, PolicyDiscovery};
use crate::content;
use crate::grammar;
use crate::model::PolicyDocument;

impl PolicyDiscovery {
    /// Scan `policies/**/*.xml` under the base directory.
    ///
    /// Each candidate is read, content-checked and resolved through the path
    /// grammar; any failure skips that candidate with a warning, as does each
    /// nested directory that cannot be listed. Failing to list the
    /// `policies/` root itself aborts the strategy.
    pub fn from_convention(&self) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        let policies_dir = self.base_dir.join("policies");

        let listing = match io::list_files(&policies_dir, "xml") {
            Ok(listing) => listing,
            Err(e) => {
                return report.fail(format!(
                    "Failed to enumerate policy files under {}: {}",
                    policies_dir, e
                ));
            }
        };

        for skipped in &listing.skipped {
            report.warn(format!("Skipped unreadable policy directory: {}", skipped));
        }

        for path in listing.files {
            let content = match io::read_text(&path) {
                Ok(content) => content,
                Err(e) => {
                    report.warn(format!("Failed to read policy file {}: {}", path, e));
                    continue;
                }
            };

            if !content::validate(&content) {
                report.warn(format!("Invalid XML content in policy file: {}", path));
                continue;
            }

            let Some(target) = grammar::classify(&path) else {
                report.warn(format!("Unrecognized policy file layout: {}", path));
                continue;
            };

            let document = match target.operation_id {
                Some(operation_id) => {
                    PolicyDocument::operation(path, target.api_id, operation_id, content)
                }
                None => PolicyDocument::api(path, target.api_id, content),
            };
            report.push(document);
        }

        report
    }
}
