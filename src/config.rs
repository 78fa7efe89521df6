//! Migration configuration describing where documents, metadata and fragments live.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

/// File name searched for in the content root when no explicit configuration is given.
pub const DEFAULT_CONFIG_FILE: &str = "example-inliner.config.json";

/// Discoverable configuration describing the filesystem layout of a migration run.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct MigrationConfig {
  /// Glob, relative to the content root, matching the documents to rewrite.
  pub documents_glob: String,
  /// Interactive-examples checkout, relative to the content root.
  pub examples_root: String,
  /// Directory inside the checkout holding the `meta.json` documents.
  pub live_examples_dir: String,
  /// File name of the metadata documents.
  pub meta_file_name: String,
  /// Path fragment marking meta-documentation that must never be rewritten.
  pub skip_path_fragment: String,
  /// Name of the fragment store; suffixes mentioning it are dropped.
  pub fragment_store_marker: String,
  /// Host that served the legacy live examples.
  pub legacy_asset_host: String,
}

impl Default for MigrationConfig {
  fn default() -> Self {
    Self {
      documents_glob: "files/**/index.md".into(),
      examples_root: "../interactive-examples".into(),
      live_examples_dir: "live-examples".into(),
      meta_file_name: "meta.json".into(),
      skip_path_fragment: "/mdn/".into(),
      fragment_store_marker: "interactive-examples".into(),
      legacy_asset_host: "interactive-examples.mdn.mozilla.net".into(),
    }
  }
}

impl MigrationConfig {
  /// Attempt to load configuration from the content root.
  ///
  /// A missing file yields the defaults. A file that fails to parse is reported and also
  /// falls back to the defaults so a run can still proceed.
  pub fn discover(content_root: &Path) -> Self {
    let candidate = content_root.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      return Self::default();
    }

    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(err) => {
        warn!(path = %candidate.display(), "ignoring configuration: {err:#}");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
  }
}

impl MigrationConfig {
  /// Absolute glob pattern matching the documents below the content root.
  pub fn documents_pattern(&self, content_root: &Path) -> String {
    glob_pattern(content_root, &self.documents_glob)
  }

  /// Root of the fragment store.
  pub fn examples_dir(&self, content_root: &Path) -> PathBuf {
    content_root.join(&self.examples_root)
  }

  /// Glob pattern matching metadata documents, optionally restricted to one family directory.
  pub fn metadata_pattern(&self, content_root: &Path, family_dir: Option<&str>) -> String {
    let mut relative = PathBuf::from(&self.live_examples_dir);
    if let Some(family) = family_dir {
      relative.push(family);
    }
    relative.push("**");
    relative.push(&self.meta_file_name);

    glob_pattern(
      &self.examples_dir(content_root),
      &relative.to_string_lossy(),
    )
  }
}

fn glob_pattern(base: &Path, relative: &str) -> String {
  let base = glob::Pattern::escape(&base.to_string_lossy().replace('\\', "/"));
  let relative = relative.replace('\\', "/");
  format!(
    "{}/{}",
    base.trim_end_matches('/'),
    relative.trim_start_matches("./")
  )
}
