//! Atomic document output.
//!
//! Every file is written to `<path>.tmp`, synced, then renamed over `<path>`,
//! so readers only ever see the previous complete file or the new one.
//! Documents go to a primary directory and are mirrored into a secondary
//! directory when that directory exists.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::Error;

/// Sibling temp path: `<path>.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_temp(path: &Path, content: &str) -> io::Result<PathBuf> {
    let tmp = temp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(tmp)
}

/// Write `content` to `path` via a temp file and rename.
///
/// On failure the temp file is removed (best effort) and the error returned;
/// the target keeps its previous content.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), Error> {
    let result = write_temp(path, content).and_then(|tmp| fs::rename(&tmp, path));

    result.map_err(|source| {
        let tmp = temp_path(path);
        if let Err(e) = fs::remove_file(&tmp)
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::debug!(path = %tmp.display(), error = %e, "could not remove temp file");
        }
        Error::WriteFailed { path: path.to_path_buf(), source }
    })
}

/// Where a document ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    pub name: String,
    pub primary: PathBuf,
    /// Mirror copy, when the secondary directory exists and the copy succeeded.
    pub mirror: Option<PathBuf>,
}

/// Writes documents to the primary directory and mirrors them.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    primary: PathBuf,
    secondary: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(primary: impl Into<PathBuf>, secondary: Option<PathBuf>) -> Self {
        Self { primary: primary.into(), secondary }
    }

    pub fn primary_dir(&self) -> &Path {
        &self.primary
    }

    /// Create the primary directory if needed.
    pub fn prepare(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.primary).map_err(|source| Error::WriteFailed { path: self.primary.clone(), source })
    }

    fn mirror_dir(&self) -> Option<&Path> {
        self.secondary.as_deref().filter(|dir| dir.is_dir())
    }

    /// Write `name` into the primary directory, then mirror it.
    ///
    /// Primary failures are returned; mirror failures are logged.
    pub fn write(&self, name: &str, content: &str) -> Result<WrittenDocument, Error> {
        let primary = self.primary.join(name);
        write_atomic(&primary, content)?;
        tracing::info!(path = %primary.display(), bytes = content.len(), "wrote sitemap document");

        let mirror = self.mirror_dir().and_then(|dir| {
            let target = dir.join(name);
            match write_atomic(&target, content) {
                Ok(()) => Some(target),
                Err(e) => {
                    tracing::warn!(path = %target.display(), error = %e, "failed to mirror sitemap document");
                    None
                }
            }
        });

        Ok(WrittenDocument { name: name.to_string(), primary, mirror })
    }

    /// Remove a document that is no longer produced from both directories.
    ///
    /// Returns true if the primary copy existed and was removed.
    pub fn retire(&self, name: &str) -> bool {
        let mut removed = false;
        for dir in std::iter::once(self.primary.as_path()).chain(self.mirror_dir()) {
            let path = dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "removed stale sitemap document");
                    removed |= dir == self.primary.as_path();
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove stale sitemap document"),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(temp_path(Path::new("out/sitemap.xml")), PathBuf::from("out/sitemap.xml.tmp"));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");

        write_atomic(&path, "<v1/>").unwrap();
        write_atomic(&path, "<v2/>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<v2/>");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_crash_before_rename_keeps_previous_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        write_atomic(&path, "<complete-v1/>").unwrap();

        // Process dies after the temp file is written but before the rename.
        write_temp(&path, "<partial").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<complete-v1/>");

        // The next run overwrites the leftover temp file and completes.
        write_atomic(&path, "<complete-v2/>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<complete-v2/>");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_rename_cleans_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let err = write_atomic(&path, "<v1/>").unwrap_err();
        assert!(matches!(err, Error::WriteFailed { .. }));
        assert!(!temp_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_writer_mirrors_when_secondary_exists() {
        let primary = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(primary.path(), Some(secondary.path().to_path_buf()));

        let written = writer.write("sitemap.xml", "<x/>").unwrap();
        assert_eq!(fs::read_to_string(primary.path().join("sitemap.xml")).unwrap(), "<x/>");
        assert_eq!(written.mirror, Some(secondary.path().join("sitemap.xml")));
        assert_eq!(fs::read_to_string(secondary.path().join("sitemap.xml")).unwrap(), "<x/>");
    }

    #[test]
    fn test_writer_tolerates_missing_secondary() {
        let primary = tempfile::tempdir().unwrap();
        let missing = primary.path().join("does-not-exist");
        let writer = OutputWriter::new(primary.path(), Some(missing.clone()));

        let written = writer.write("sitemap.xml", "<x/>").unwrap();
        assert_eq!(written.mirror, None);
        assert!(!missing.exists());
    }

    #[test]
    fn test_writer_primary_failure_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(root.path().join("missing-dir"), None);
        assert!(writer.write("sitemap.xml", "<x/>").is_err());
    }

    #[test]
    fn test_retire_removes_both_copies() {
        let primary = tempfile::tempdir().unwrap();
        let secondary = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(primary.path(), Some(secondary.path().to_path_buf()));
        writer.write("sitemap-accessories.xml", "<x/>").unwrap();

        assert!(writer.retire("sitemap-accessories.xml"));
        assert!(!primary.path().join("sitemap-accessories.xml").exists());
        assert!(!secondary.path().join("sitemap-accessories.xml").exists());
        assert!(!writer.retire("sitemap-accessories.xml"));
    }
}
