use std::{fs::File, io::Write, path::{Path, PathBuf}};

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the directory already exists.
pub(crate) fn require_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Error unless a regular file exists at `path`.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Write-then-rename wrapper so a reader never sees a half-written output.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temp file next to `target`, creating parent directories as needed.
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_dir_exists(parent)?;
        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp file in {}", parent.display()))?;

        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Persist the temp file over the target path.
    pub(crate) fn finalize(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort fsync
        self.tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Atomically replace the file at `path` with `bytes`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut sink = PendingWrite::open(path)?;
    sink.write_all(bytes)
        .with_context(|| format!("write {}", path.display()))?;
    sink.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn require_file_rejects_directory_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(require_file_exists(dir.path()).is_err());
        assert!(require_file_exists(&dir.path().join("nope.csv")).is_err());
        assert!(require_dir_exists(dir.path()).is_ok());
    }
}
