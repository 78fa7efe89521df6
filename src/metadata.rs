//! Loading of `meta.json` documents into an identifier-keyed metadata map.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::ExampleMetaRecord;

/// On-disk layout of a metadata document.
#[derive(Debug, Default, Deserialize)]
pub struct MetaDocument {
  /// Records keyed by an arbitrary page identifier, in document order.
  #[serde(default)]
  pub pages: IndexMap<String, ExampleMetaRecord>,
}

/// Errors that can occur while building the metadata map.
#[derive(Debug, Error)]
pub enum MetadataError {
  /// The discovery pattern is not a valid glob.
  #[error("invalid metadata pattern {pattern}")]
  Pattern {
    /// Pattern that failed to compile.
    pattern: String,
    /// Source pattern error.
    #[source]
    source: glob::PatternError,
  },
  /// A matched path could not be inspected during discovery.
  #[error("failed to walk metadata documents")]
  Walk(#[from] glob::GlobError),
  /// Failed to read a metadata document from disk.
  #[error("failed to read {}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// Failed to parse a metadata document.
  #[error("failed to parse {}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
}

/// Example metadata keyed by the file name referenced from macro invocations.
#[derive(Debug, Clone, Default)]
pub struct MetadataMap {
  records: HashMap<String, ExampleMetaRecord>,
}

impl MetadataMap {
  /// Discover every document matching `pattern` and merge the records accepted by `filter`.
  ///
  /// Documents are visited in the sorted order produced by the glob walk and records in
  /// document order, so a repeated identifier resolves to the last record seen.
  pub fn load<F>(pattern: &str, filter: F) -> Result<Self, MetadataError>
  where
    F: Fn(&ExampleMetaRecord) -> bool,
  {
    let paths = glob::glob(pattern).map_err(|source| MetadataError::Pattern {
      pattern: pattern.to_string(),
      source,
    })?;

    let mut map = Self::default();
    for path in paths {
      let path = path?;
      let content = fs::read_to_string(&path).map_err(|source| MetadataError::Io {
        path: path.clone(),
        source,
      })?;
      let document: MetaDocument =
        serde_json::from_str(&content).map_err(|source| MetadataError::Parse {
          path: path.clone(),
          source,
        })?;
      debug!(path = %path.display(), records = document.pages.len(), "loaded metadata");
      map.extend_filtered(document, &filter);
    }

    Ok(map)
  }

  /// Merge the records of a parsed document accepted by `filter`.
  pub fn extend_filtered<F>(&mut self, document: MetaDocument, filter: F)
  where
    F: Fn(&ExampleMetaRecord) -> bool,
  {
    for record in document.pages.into_values() {
      if filter(&record) {
        self.insert(record);
      }
    }
  }

  /// Insert a record, replacing (and returning) any earlier record with the same identifier.
  pub fn insert(&mut self, record: ExampleMetaRecord) -> Option<ExampleMetaRecord> {
    self.records.insert(record.file_name.clone(), record)
  }

  /// Look up a record by its exact identifier.
  pub fn get(&self, file_name: &str) -> Option<&ExampleMetaRecord> {
    self.records.get(file_name)
  }

  /// Number of distinct identifiers.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  /// Returns true when no records were loaded.
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

impl FromIterator<ExampleMetaRecord> for MetadataMap {
  fn from_iter<I: IntoIterator<Item = ExampleMetaRecord>>(iter: I) -> Self {
    let mut map = Self::default();
    for record in iter {
      map.insert(record);
    }
    map
  }
}
