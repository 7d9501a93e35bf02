use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FleetError, Result};

const YAML_EXTENSION: &str = "yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Dir,
}

/// Where robot definitions are read from.
pub trait FleetSource {
    /// `None` when nothing exists at `path`.
    fn kind(&self, path: &Path) -> Option<SourceKind>;

    /// Every `.yaml` file below `dir`, recursively.
    fn yaml_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> Result<String>;
}

/// Reads definitions from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl FleetSource for FsSource {
    fn kind(&self, path: &Path) -> Option<SourceKind> {
        let meta = fs::metadata(path).ok()?;
        Some(if meta.is_dir() { SourceKind::Dir } else { SourceKind::File })
    }

    fn yaml_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|source| FleetError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_file() && entry.path().extension().is_some_and(|e| e == YAML_EXTENSION) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| FleetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
