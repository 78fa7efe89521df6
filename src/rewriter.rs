//! Batch driver that expands embed macros across a tree of documents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, error, info, info_span, warn};

use crate::config::MigrationConfig;
use crate::invocation::find_macro_invocations;
use crate::metadata::{MetadataError, MetadataMap};
use crate::resolver::{ExampleKind, FragmentStore, Resolution, ResolveError, Resolver};
use crate::splice::Splicer;

/// What happened to a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
  /// No invocation was expanded.
  Unchanged,
  /// At least one invocation was expanded and the result was written (unless dry-running).
  Rewritten,
  /// The document is meta-documentation; its rewrite was discarded.
  Skipped,
}

/// Rewritten text of a document together with what could not be resolved in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRewrite {
  /// Document text with every resolvable invocation expanded.
  pub text: String,
  /// Identifiers without a metadata record, one per invocation.
  pub missing_examples: Vec<String>,
  /// Legacy media references left unmapped in the inlined fragments.
  pub unmapped_assets: Vec<String>,
}

/// Result of rewriting one document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRewrite {
  /// Whether the document was written, skipped or left alone.
  pub outcome: DocumentOutcome,
  /// Identifiers without a metadata record, one per invocation.
  pub missing_examples: Vec<String>,
  /// Legacy media references left unmapped in the inlined fragments.
  pub unmapped_assets: Vec<String>,
}

/// Totals for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
  /// Documents read.
  pub processed: usize,
  /// Documents whose content changed.
  pub rewritten: usize,
  /// Meta-documentation documents left untouched.
  pub skipped: usize,
  /// Invocations left in place because their identifier had no metadata.
  pub missing_examples: usize,
  /// Legacy media references that had no canonical replacement.
  pub unmapped_assets: usize,
  /// Documents whose rewrite was aborted by an error.
  pub failed: Vec<PathBuf>,
}

/// Expands embed macros in documents using one resolver per enabled example kind.
#[derive(Debug, Clone)]
pub struct DocumentRewriter {
  resolvers: Vec<Resolver>,
  splicer: Splicer,
  skip_path_fragment: String,
  content_root: Option<PathBuf>,
  dry_run: bool,
}

impl DocumentRewriter {
  /// Create a rewriter from prepared resolvers.
  pub fn new(resolvers: Vec<Resolver>, splicer: Splicer, skip_path_fragment: impl Into<String>) -> Self {
    Self {
      resolvers,
      splicer,
      skip_path_fragment: skip_path_fragment.into(),
      content_root: None,
      dry_run: false,
    }
  }

  /// Build resolvers for `kinds`, loading their metadata from the configured checkout.
  pub fn from_config(
    config: &MigrationConfig,
    content_root: &Path,
    kinds: &[ExampleKind],
  ) -> Result<Self, MetadataError> {
    let store = FragmentStore::new(config.examples_dir(content_root));
    let mut resolvers = Vec::with_capacity(kinds.len());

    for &kind in kinds {
      let pattern = config.metadata_pattern(content_root, kind.metadata_family_dir());
      let metadata = MetadataMap::load(&pattern, |record| kind.accepts_record(record))?;
      info!(kind = %kind, records = metadata.len(), "loaded example metadata");
      resolvers.push(Resolver::new(
        kind,
        metadata,
        store.clone(),
        config.legacy_asset_host.as_str(),
      ));
    }

    Ok(
      Self::new(
        resolvers,
        Splicer::new(config.fragment_store_marker.as_str()),
        config.skip_path_fragment.as_str(),
      )
      .content_root(content_root),
    )
  }

  /// Match the skip fragment against document paths relative to `root`.
  pub fn content_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.content_root = Some(root.into());
    self
  }

  /// Compute the rewrite without writing anything back.
  pub fn dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  /// Expand every resolvable invocation in `content`.
  ///
  /// Resolvers run one after another, each over the output of the previous one. Invocations a
  /// resolver does not handle, or cannot find metadata for, are copied verbatim. Resolvers
  /// sharing a path prefix share their metadata, so a missing identifier is reported only by
  /// the first of them. An error abandons the whole document.
  pub fn rewrite_content(&self, content: &str) -> Result<ContentRewrite, ResolveError> {
    let mut rewrite = ContentRewrite {
      text: content.to_string(),
      ..ContentRewrite::default()
    };

    for (index, resolver) in self.resolvers.iter().enumerate() {
      let prefix = resolver.kind().path_prefix();
      let reports_missing = !self.resolvers[..index]
        .iter()
        .any(|earlier| earlier.kind().path_prefix() == prefix);

      let current = &rewrite.text;
      let mut output = String::with_capacity(current.len());
      let mut cursor = 0;

      for invocation in find_macro_invocations(current) {
        let replacement = match resolver.resolve(&invocation)? {
          Resolution::NotApplicable => continue,
          Resolution::NotFound(file_name) => {
            if reports_missing {
              warn!(kind = %resolver.kind(), "No such file: {file_name}");
              rewrite.missing_examples.push(file_name);
            }
            continue;
          }
          Resolution::Resolved(example) => {
            rewrite
              .unmapped_assets
              .extend(example.unmapped_assets.iter().cloned());
            self.splicer.splice(&example, invocation.suffix())
          }
        };

        output.push_str(&current[cursor..invocation.span.start]);
        output.push_str(&replacement);
        cursor = invocation.span.end;
      }

      output.push_str(&current[cursor..]);
      rewrite.text = output;
    }

    Ok(rewrite)
  }

  /// Rewrite a single document in place.
  pub fn rewrite_document(&self, path: &Path) -> Result<DocumentRewrite> {
    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let rewrite = self
      .rewrite_content(&content)
      .with_context(|| format!("failed to expand examples in {}", path.display()))?;

    let outcome = if rewrite.text == content {
      DocumentOutcome::Unchanged
    } else if self.is_meta_documentation(path) {
      info!("Skipping file: {}", path.display());
      DocumentOutcome::Skipped
    } else {
      if !self.dry_run {
        fs::write(path, &rewrite.text)
          .with_context(|| format!("failed to write {}", path.display()))?;
      }
      DocumentOutcome::Rewritten
    };

    Ok(DocumentRewrite {
      outcome,
      missing_examples: rewrite.missing_examples,
      unmapped_assets: rewrite.unmapped_assets,
    })
  }

  /// Rewrite every document matching `pattern`, in sorted order.
  ///
  /// Per-document failures are logged and collected in the report; only an invalid pattern
  /// aborts the run.
  pub fn run(&self, pattern: &str) -> Result<RewriteReport> {
    let paths =
      glob::glob(pattern).with_context(|| format!("invalid document pattern {pattern}"))?;
    let mut report = RewriteReport::default();

    for path in paths {
      let path = match path {
        Ok(path) => path,
        Err(err) => {
          warn!("skipping unreadable match: {err}");
          continue;
        }
      };
      if !path.is_file() {
        continue;
      }

      let _span = info_span!("document", path = %path.display()).entered();
      debug!("processing document");
      report.processed += 1;

      match self.rewrite_document(&path) {
        Ok(document) => {
          match document.outcome {
            DocumentOutcome::Unchanged => {}
            DocumentOutcome::Rewritten => report.rewritten += 1,
            DocumentOutcome::Skipped => report.skipped += 1,
          }
          report.missing_examples += document.missing_examples.len();
          report.unmapped_assets += document.unmapped_assets.len();
        }
        Err(err) => {
          error!("{err:#}");
          report.failed.push(path);
        }
      }
    }

    Ok(report)
  }

  fn is_meta_documentation(&self, path: &Path) -> bool {
    if self.skip_path_fragment.is_empty() {
      return false;
    }

    let relative = self
      .content_root
      .as_deref()
      .and_then(|root| path.strip_prefix(root).ok())
      .unwrap_or(path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    format!("/{}", relative.trim_start_matches('/')).contains(&self.skip_path_fragment)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::ExampleMetaRecord;
  use pretty_assertions::assert_eq;
  use tempfile::{TempDir, tempdir};

  fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
  }

  fn js_rewriter() -> (TempDir, DocumentRewriter) {
    let dir = tempdir().unwrap();
    let store_root = dir.path().join("store");
    write_file(
      &store_root.join("js-examples/array-filter/index.html"),
      "console.log(1)",
    );

    let metadata = [ExampleMetaRecord {
      file_name: "array-filter.html".into(),
      title: "Array.filter".into(),
      example_code: Some("js-examples/array-filter/index.html".into()),
      ..ExampleMetaRecord::default()
    }]
    .into_iter()
    .collect();
    let resolver = Resolver::new(ExampleKind::Js, metadata, FragmentStore::new(store_root), "");
    let rewriter = DocumentRewriter::new(
      vec![resolver],
      Splicer::new("interactive-examples"),
      "/mdn/",
    );
    (dir, rewriter)
  }

  #[test]
  fn expands_invocations_and_keeps_surrounding_text() {
    let (_dir, rewriter) = js_rewriter();
    let content = "## Try it\n\n{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n\n## Syntax\n";
    let updated = rewriter.rewrite_content(content).unwrap().text;
    assert_eq!(
      updated,
      "## Try it\n\n{{InteractiveExample(\"Array.filter\")}}\n\n```js interactive-example\nconsole.log(1)\n```\n\n## Syntax\n"
    );
  }

  #[test]
  fn leaves_unknown_and_foreign_invocations_untouched() {
    let (_dir, rewriter) = js_rewriter();
    let content = "{{EmbedInteractiveExample(\"pages/js/missing.html\")}}\n{{EmbedInteractiveExample(\"pages/css/color.html\", \"taller\")}} tail\n";
    assert_eq!(rewriter.rewrite_content(content).unwrap().text, content);
  }

  #[test]
  fn second_pass_is_a_no_op() {
    let (_dir, rewriter) = js_rewriter();
    let content = "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}} See below.\n";
    let once = rewriter.rewrite_content(content).unwrap().text;
    let twice = rewriter.rewrite_content(&once).unwrap().text;
    assert_eq!(once, twice);
    assert_eq!(once.matches("See below.").count(), 1);
  }

  #[test]
  fn skips_meta_documentation_that_would_change() {
    let (dir, rewriter) = js_rewriter();
    let document = dir.path().join("files/en-us/mdn/writing_guidelines/index.md");
    let original = "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n";
    write_file(&document, original);

    assert_eq!(rewriter.rewrite_document(&document).unwrap().outcome, DocumentOutcome::Skipped);
    assert_eq!(fs::read_to_string(&document).unwrap(), original);
  }

  #[test]
  fn dry_run_does_not_write() {
    let (dir, rewriter) = js_rewriter();
    let rewriter = rewriter.dry_run(true);
    let document = dir.path().join("files/en-us/web/javascript/index.md");
    let original = "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n";
    write_file(&document, original);

    assert_eq!(rewriter.rewrite_document(&document).unwrap().outcome, DocumentOutcome::Rewritten);
    assert_eq!(fs::read_to_string(&document).unwrap(), original);
  }

  #[test]
  fn run_continues_after_document_failures() {
    let (dir, rewriter) = js_rewriter();
    let store_root = dir.path().join("store");
    let broken = ExampleMetaRecord {
      file_name: "broken.html".into(),
      title: "Broken".into(),
      example_code: Some("js-examples/broken.js".into()),
      ..ExampleMetaRecord::default()
    };
    let metadata = [
      broken,
      ExampleMetaRecord {
        file_name: "array-filter.html".into(),
        title: "Array.filter".into(),
        example_code: Some("js-examples/array-filter/index.html".into()),
        ..ExampleMetaRecord::default()
      },
    ]
    .into_iter()
    .collect();
    let rewriter = DocumentRewriter::new(
      vec![Resolver::new(ExampleKind::Js, metadata, FragmentStore::new(store_root), "")],
      rewriter.splicer.clone(),
      "/mdn/",
    );

    let failing = dir.path().join("files/a/index.md");
    let failing_content = "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n{{EmbedInteractiveExample(\"pages/js/broken.html\")}}\n";
    write_file(&failing, failing_content);
    let passing = dir.path().join("files/b/index.md");
    write_file(&passing, "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n");
    let untouched = dir.path().join("files/c/index.md");
    write_file(&untouched, "Nothing to see.\n");

    let pattern = format!(
      "{}/files/**/index.md",
      glob::Pattern::escape(&dir.path().to_string_lossy())
    );
    let report = rewriter.run(&pattern).unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.rewritten, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, vec![failing.clone()]);
    assert_eq!(fs::read_to_string(&failing).unwrap(), failing_content);
    assert!(fs::read_to_string(&passing).unwrap().contains("```js interactive-example"));
  }

  #[test]
  fn meta_documentation_guard_ignores_where_the_content_root_lives() {
    let dir = tempdir().unwrap();
    let content_root = dir.path().join("mdn/content");
    let examples = dir.path().join("mdn/interactive-examples");
    write_file(
      &examples.join("live-examples/js-examples/array/meta.json"),
      r#"{"pages": {"arrayFilter": {
        "exampleCode": "live-examples/js-examples/array/array-filter.js",
        "fileName": "array-filter.html",
        "title": "Array.filter"
      }}}"#,
    );
    write_file(
      &examples.join("live-examples/js-examples/array/array-filter.js"),
      "console.log(1)",
    );

    let invocation = "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n";
    let page = content_root.join("files/en-us/web/javascript/index.md");
    write_file(&page, invocation);
    let guide = content_root.join("files/en-us/mdn/writing_guidelines/index.md");
    write_file(&guide, invocation);

    let config = MigrationConfig::default();
    let rewriter =
      DocumentRewriter::from_config(&config, &content_root, &[ExampleKind::Js]).unwrap();
    let report = rewriter.run(&config.documents_pattern(&content_root)).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.rewritten, 1);
    assert_eq!(report.skipped, 1);
    assert!(fs::read_to_string(&page).unwrap().starts_with("{{InteractiveExample(\"Array.filter\")}}"));
    assert_eq!(fs::read_to_string(&guide).unwrap(), invocation);
  }

  #[test]
  fn shared_prefixes_report_a_missing_identifier_once() {
    let dir = tempdir().unwrap();
    let store = FragmentStore::new(dir.path());
    let rewriter = DocumentRewriter::new(
      vec![
        Resolver::new(ExampleKind::CssTabbed, MetadataMap::default(), store.clone(), ""),
        Resolver::new(ExampleKind::HtmlTabbed, MetadataMap::default(), store, ""),
      ],
      Splicer::new("interactive-examples"),
      "/mdn/",
    );

    let content = "{{EmbedInteractiveExample(\"pages/tabbed/gone.html\")}}\n{{EmbedInteractiveExample(\"pages/tabbed/gone.html\")}}\n";
    let rewrite = rewriter.rewrite_content(content).unwrap();
    assert_eq!(rewrite.text, content);
    assert_eq!(rewrite.missing_examples, vec!["gone.html".to_string(), "gone.html".to_string()]);
  }

  #[test]
  fn run_totals_missing_examples_and_unmapped_assets() {
    let (dir, rewriter) = js_rewriter();
    write_file(
      &dir.path().join("store/js-examples/array-filter/index.html"),
      "play(\"/media/examples/not-in-table.mp3\");",
    );
    write_file(
      &dir.path().join("files/a/index.md"),
      "{{EmbedInteractiveExample(\"pages/js/array-filter.html\")}}\n{{EmbedInteractiveExample(\"pages/js/nowhere.html\")}}\n",
    );

    let pattern = format!(
      "{}/files/**/index.md",
      glob::Pattern::escape(&dir.path().to_string_lossy())
    );
    let report = rewriter.run(&pattern).unwrap();

    assert_eq!(report.rewritten, 1);
    assert_eq!(report.missing_examples, 1);
    assert_eq!(report.unmapped_assets, 1);
  }
}
