//! Directory handles

use std::path::{Path, PathBuf};

use crate::error::Result;

/// A directory of the disc tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirHandle {
    path: PathBuf,
}

/// A regular file found in a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// File name as stored on disc
    pub name: String,
    /// `None` when the length could not be read
    pub size: Option<u64>,
}

impl FileEntry {
    fn from_path(path: PathBuf) -> Option<Self> {
        let Some(name) = path.file_name()?.to_str() else {
            tracing::debug!("Skipping {:?}: file name is not UTF-8", path);
            return None;
        };
        let name = name.to_string();
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Some(Self { path, name, size })
    }

    /// Extension as stored on disc, without the dot
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// Catalog key: the uppercased file name
    pub fn key(&self) -> String {
        self.name.to_uppercase()
    }
}

impl DirHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, empty for a filesystem root
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    pub fn parent(&self) -> Option<DirHandle> {
        self.path.parent().map(DirHandle::new)
    }

    /// Child directories, sorted by name
    pub fn child_dirs(&self) -> Result<Vec<DirHandle>> {
        let mut dirs: Vec<DirHandle> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .map(DirHandle::new)
            .collect();
        dirs.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(dirs)
    }

    /// Regular files, sorted by name
    pub fn files(&self) -> Result<Vec<FileEntry>> {
        let mut files: Vec<FileEntry> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(FileEntry::from_path)
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Files whose extension matches `ext` exactly
    pub fn files_with_extension(&self, ext: &str) -> Result<Vec<FileEntry>> {
        Ok(self
            .files()?
            .into_iter()
            .filter(|f| f.extension() == Some(ext))
            .collect())
    }

    /// True if the directory holds at least one regular file. Unreadable
    /// directories count as empty.
    pub fn has_files(&self) -> bool {
        self.files().map(|f| !f.is_empty()).unwrap_or(false)
    }

    /// Path of a direct child, whether or not it exists
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}
