//! Resolve test file names to paths
//!
//! The default resolution is a recursive search for an exact file name below a root directory.
//! All files of a directory are checked before descending into its subdirectories and entries are
//! visited sorted by name, so the first match is the same on every platform.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{debug, trace, warn};

use crate::envs;
use crate::error::Error;

/// Resolve the name of an input or output file to the path of an existing file
pub trait FileResolver {
    /// Return the path of the file with the given `name` or fail with
    /// [`crate::Error::FileNotFound`]
    fn resolve(&self, name: &str) -> Result<PathBuf>;
}

/// Search a file by its exact name in a directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocator {
    root: PathBuf,
}

/// Resolve file names directly relative to a single directory without searching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory(PathBuf);

impl FileLocator {
    /// Create a new `FileLocator` searching below `root`
    pub fn new<T>(root: T) -> Self
    where
        T: Into<PathBuf>,
    {
        Self { root: root.into() }
    }

    /// The `FileLocator` with the default root
    ///
    /// The root is taken from the `JUDGE_FIXTURE_ROOT` environment variable and falls back to the
    /// current directory.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = std::env::var_os(envs::JUDGE_FIXTURE_ROOT) {
            debug!(
                "Using search root from {}: '{}'",
                envs::JUDGE_FIXTURE_ROOT,
                Path::new(&root).display()
            );
            return Ok(Self::new(root));
        }

        let current_dir = std::env::current_dir().map_err(|error| {
            Error::ReadError(
                PathBuf::from("."),
                format!("Failed to detect current directory: {error}"),
            )
        })?;
        Ok(Self::new(current_dir))
    }

    /// The root directory of the search
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Search the file named `file_name` below the root directory
    ///
    /// Returns `Ok(None)` if there's no such file anywhere in the tree. Only the root directory
    /// itself has to be readable, unreadable subdirectories are skipped.
    pub fn locate(&self, file_name: &str) -> Result<Option<PathBuf>> {
        let entries = read_sorted(&self.root).map_err(|error| {
            Error::ReadError(
                self.root.clone(),
                format!("Failed to list directory: {error}"),
            )
        })?;
        Ok(search(&self.root, entries, OsStr::new(file_name)))
    }
}

impl FileResolver for FileLocator {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        match self.locate(name)? {
            Some(path) => {
                debug!("Resolved '{name}' to '{}'", path.display());
                Ok(path)
            }
            None => Err(Error::FileNotFound(name.to_owned(), self.root.clone()).into()),
        }
    }
}

impl Directory {
    /// Create a new `Directory` resolver
    pub fn new<T>(dir: T) -> Self
    where
        T: Into<PathBuf>,
    {
        Self(dir.into())
    }
}

impl FileResolver for Directory {
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let path = self.0.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(Error::FileNotFound(name.to_owned(), self.0.clone()).into())
        }
    }
}

impl<F> FileResolver for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        self(name).ok_or_else(|| Error::FileNotFound(name.to_owned(), PathBuf::new()).into())
    }
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(fs::DirEntry::file_name);
    Ok(entries)
}

fn search(dir: &Path, entries: Vec<fs::DirEntry>, file_name: &OsStr) -> Option<PathBuf> {
    trace!("Searching '{}'", dir.display());

    // Symlinks are not followed into directories to avoid cycles
    let mut directories = vec![];
    for entry in entries {
        let path = entry.path();
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => directories.push(path),
            Ok(_) => {
                if entry.file_name() == file_name && !path.is_dir() {
                    return Some(path);
                }
            }
            Err(error) => warn!("Skipping '{}': {error}", path.display()),
        }
    }

    directories.into_iter().find_map(|dir| match read_sorted(&dir) {
        Ok(entries) => search(&dir, entries, file_name),
        Err(error) => {
            warn!("Skipping unreadable directory '{}': {error}", dir.display());
            None
        }
    })
}
