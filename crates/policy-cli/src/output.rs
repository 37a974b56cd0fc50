//! Publication of the run's single output value

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Output name read by workflow steps that consume this tool
pub const ETAG_OUTPUT: &str = "etag";

/// Environment variable naming the workflow output file
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Render the output line for `etag`
pub fn etag_line(etag: &str) -> String {
    format!("{}={}", ETAG_OUTPUT, etag)
}

/// Publish `etag` on stdout, and to `$GITHUB_OUTPUT` when it is set.
///
/// `print` is false when stdout is reserved for JSON output.
pub fn publish_etag(etag: &str, print: bool) -> Result<()> {
    if print {
        println!("{}", etag_line(etag));
    }

    if let Some(path) = std::env::var_os(GITHUB_OUTPUT).filter(|p| !p.is_empty()) {
        append_output(Path::new(&path), etag)?;
    }

    Ok(())
}

fn append_output(path: &Path, etag: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", etag_line(etag))?;
    tracing::debug!("Wrote {} output to {}", ETAG_OUTPUT, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_etag_line() {
        assert_eq!(etag_line("\"abc\""), "etag=\"abc\"");
        assert_eq!(etag_line(""), "etag=");
    }

    #[test]
    fn test_append_keeps_existing_outputs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("output");
        fs::write(&path, "other=1\n").unwrap();

        append_output(&path, "v2").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "other=1\netag=v2\n");
    }
}
