//! Filesystem path values with lazy queries.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::domain::error::ValueError;

/// A path as given on the command line.
///
/// Construction never touches the filesystem. Queries hit the filesystem each
/// time they are called and report I/O failures instead of hiding them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FsPath {
    raw: String,
}

impl FsPath {
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        if raw.is_empty() {
            return Err(ValueError::Empty);
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The path with `~` expanded, exactly as it would be opened.
    pub fn expanded(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.raw).into_owned())
    }

    /// Absolute form, joined onto the current directory when relative.
    /// Does not resolve symlinks or require the path to exist.
    pub fn resolved(&self) -> io::Result<PathBuf> {
        let expanded = self.expanded();
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(std::env::current_dir()?.join(expanded))
        }
    }

    pub fn exists(&self) -> io::Result<bool> {
        self.expanded().try_exists()
    }

    pub fn is_file(&self) -> io::Result<bool> {
        Ok(fs::metadata(self.expanded())?.is_file())
    }

    pub fn is_dir(&self) -> io::Result<bool> {
        Ok(fs::metadata(self.expanded())?.is_dir())
    }

    pub fn read_to_string(&self) -> io::Result<String> {
        fs::read_to_string(self.expanded())
    }

    pub fn basename(&self) -> Option<String> {
        Path::new(&self.raw)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn dirname(&self) -> Option<PathBuf> {
        Path::new(&self.raw).parent().map(Path::to_path_buf)
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.raw)
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_string)
    }
}

impl AsRef<Path> for FsPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.raw)
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
