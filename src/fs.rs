//! File access used by the bumper and the changelog generator

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Whole-file read/write access rooted at a working directory
pub trait FileSystem {
    /// Resolve a path against the working directory unless it is absolute
    fn resolve(&self, path: &Path) -> PathBuf;

    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace the file content, creating the file and its parent
    /// directories when missing
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// [FileSystem] backed by the local disk
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalFileSystem { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSystem for LocalFileSystem {
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(self.resolve(path))?)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(fs::write(path, contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        fs.write(Path::new("VERSION"), b"1.0.0\n").unwrap();
        assert!(fs.exists(Path::new("VERSION")));
        assert!(dir.path().join("VERSION").is_file());
        assert_eq!(fs.read_to_string(Path::new("VERSION")).unwrap(), "1.0.0\n");
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        fs.write(Path::new("docs/CHANGELOG.md"), b"# Changelog\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("docs/CHANGELOG.md")).unwrap(),
            "# Changelog\n"
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());
        let target = other.path().join("notes.txt");

        assert_eq!(fs.resolve(&target), target);
        assert!(!fs.exists(&target));
        assert!(fs.read_to_string(&target).is_err());
    }
}
