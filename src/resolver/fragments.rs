use std::fs;
use std::path::{Path, PathBuf};

use super::ResolveError;

/// Read-only view over the interactive-examples checkout holding fragment sources.
#[derive(Debug, Clone)]
pub struct FragmentStore {
  root: PathBuf,
}

impl FragmentStore {
  /// Create a store rooted at the given directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Directory fragment paths are resolved against.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Read a fragment by the relative path recorded in its metadata.
  ///
  /// A missing or unreadable file is an error: callers must never continue with empty content.
  pub fn read(&self, relative: &str) -> Result<String, ResolveError> {
    let path = self.root.join(relative);
    fs::read_to_string(&path).map_err(|source| ResolveError::MissingFragment { path, source })
  }
}
