use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;

use crate::reexports::{ExportSet, scan_exports};

/// Read-only access to public-surface files.
///
/// The policy engine only ever asks two questions: does a file exist, and what does it export.
/// Implementations must be shareable across the worker threads that evaluate occurrences.
pub trait PublicSurfaceReader: Send + Sync {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String>;

    fn exists(&self, path: &Utf8Path) -> bool;

    /// Names exported by `path`. A missing or unreadable file has no exports.
    fn exports(&self, path: &Utf8Path) -> Option<ExportSet> {
        if !self.exists(path) {
            return None;
        }
        match self.read_to_string(path) {
            Ok(text) => Some(scan_exports(&text)),
            Err(err) => {
                tracing::debug!(path = %path, error = %err, "public surface unreadable");
                None
            }
        }
    }
}

/// File-system backed [`PublicSurfaceReader`].
#[derive(Debug, Clone, Default)]
pub struct FsSurfaceReader {
    root: Option<Utf8PathBuf>,
}

impl FsSurfaceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root` instead of the working directory.
    pub fn with_root(root: Utf8PathBuf) -> Self {
        Self { root: Some(root) }
    }

    fn abs(&self, path: &Utf8Path) -> Utf8PathBuf {
        match &self.root {
            Some(root) if !path.is_absolute() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl PublicSurfaceReader for FsSurfaceReader {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        let abs = self.abs(path);
        fs::read_to_string(&abs).with_context(|| format!("read {}", abs))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.abs(path).is_file()
    }
}

/// In-memory [`PublicSurfaceReader`], keyed by forward-slash path.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaceReader {
    files: BTreeMap<Utf8PathBuf, String>,
}

impl MemorySurfaceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl PublicSurfaceReader for MemorySurfaceReader {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.files
            .get(path)
            .cloned()
            .with_context(|| format!("no in-memory file at {}", path))
    }

    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reader_scans_exports() {
        let reader = MemorySurfaceReader::new().with_file(
            "/p/src/entities/User/index.ts",
            "export { UserCard } from './ui/UserCard';",
        );
        let set = reader
            .exports(Utf8Path::new("/p/src/entities/User/index.ts"))
            .expect("exists");
        assert!(set.contains("UserCard"));
        assert!(reader.exports(Utf8Path::new("/p/src/entities/User/testing.ts")).is_none());
    }

    #[test]
    fn fs_reader_treats_missing_file_as_no_exports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        fs::write(root.join("index.ts"), "export const a = 1;").expect("write");

        let reader = FsSurfaceReader::with_root(root.clone());
        assert!(reader.exports(Utf8Path::new("index.ts")).is_some_and(|s| s.contains("a")));
        assert!(reader.exports(Utf8Path::new("missing.ts")).is_none());
        assert!(reader.exports(&root).is_none(), "directories are not surfaces");
    }
}
