//! Text reads and recursive file enumeration

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Files found by [`list_files`], plus the entries the walk had to skip.
#[derive(Debug, Default)]
pub struct FileListing {
    pub files: Vec<NormalizedPath>,
    /// Nested directories or entries that could not be read
    pub skipped: Vec<Error>,
}

/// Recursively list files under `root` whose extension equals `extension`.
///
/// The comparison is case-sensitive. Directory entries are visited in name
/// order so results are deterministic across platforms. A missing `root`
/// yields an empty listing; a `root` that exists but is not a directory, or
/// cannot be read, is an error. Unreadable entries below the root are
/// recorded in [`FileListing::skipped`] and the walk continues.
pub fn list_files(root: &NormalizedPath, extension: &str) -> Result<FileListing> {
    let mut listing = FileListing::default();

    if !root.exists() {
        tracing::debug!(root = %root, "Enumeration root does not exist");
        return Ok(listing);
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_native(),
        });
    }

    walk(root, extension, &mut listing)?;
    Ok(listing)
}

fn walk(dir: &NormalizedPath, extension: &str, listing: &mut FileListing) -> Result<()> {
    let native = dir.to_native();
    let mut entries = fs::read_dir(&native)
        .map_err(|e| Error::io(&native, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(&native, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        let path = dir.join(&name);
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Skipping unreadable entry");
                listing.skipped.push(Error::io(entry.path(), e));
                continue;
            }
        };

        if file_type.is_dir() {
            if let Err(e) = walk(&path, extension, listing) {
                tracing::debug!(path = %path, error = %e, "Skipping unreadable directory");
                listing.skipped.push(e);
            }
        } else if path.extension() == Some(extension) && path.is_file() {
            listing.files.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path().join("absent"));
        let listing = list_files(&root, "xml").unwrap();
        assert!(listing.files.is_empty());
        assert!(listing.skipped.is_empty());
    }

    #[test]
    fn test_list_files_rejects_file_root() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("policies");
        fs::write(&file, "not a dir").unwrap();

        let result = list_files(&NormalizedPath::new(&file), "xml");
        assert!(matches!(result, Err(Error::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_skips_unreadable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path().join("policies");
        fs::create_dir_all(root.join("locked")).unwrap();
        fs::create_dir_all(root.join("open")).unwrap();
        fs::write(root.join("locked/api.xml"), "x").unwrap();
        fs::write(root.join("open/api.xml"), "x").unwrap();

        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users read through the mode bits
        let enforced = fs::read_dir(&locked).is_err();

        let result = list_files(&NormalizedPath::new(&root), "xml");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if !enforced {
            return;
        }

        let listing = result.unwrap();
        assert_eq!(listing.files.len(), 1);
        assert!(listing.files[0].as_str().ends_with("open/api.xml"));
        assert_eq!(listing.skipped.len(), 1);
        assert!(listing.skipped[0].to_string().contains("locked"));
    }
}
