//! Resolution of macro invocations into example fragments, one resolver per example kind.

mod fragments;
mod markup;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset_paths::{
  map_asset_references, references_legacy_assets, references_stylesheet_assets,
};
use crate::invocation::MacroInvocation;
use crate::metadata::MetadataMap;
use crate::models::{ExampleMetaRecord, Fragment, FragmentRole, ResolvedExample};

pub use fragments::FragmentStore;
pub use markup::{CssExampleMarkup, extract_css_example};

/// Errors that abort the rewrite of the current document.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// A fragment referenced by a metadata record could not be read.
  #[error("failed to read fragment {}", .path.display())]
  MissingFragment {
    /// Path of the fragment on disk.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// The markup fragment has no `section#default-example`.
  #[error("no default-example section in {}", .path.display())]
  MissingSection {
    /// Path of the markup fragment.
    path: PathBuf,
  },
  /// The markup fragment has no `language-css` style choices.
  #[error("no style choices in {}", .path.display())]
  MissingChoices {
    /// Path of the markup fragment.
    path: PathBuf,
  },
  /// The markup fragment could not be scanned.
  #[error("failed to parse markup in {}", .path.display())]
  Markup {
    /// Path of the markup fragment.
    path: PathBuf,
    /// Source parser error.
    #[source]
    source: quick_xml::Error,
  },
}

/// Category of interactive example, selected by the macro's path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum ExampleKind {
  /// JavaScript examples (`pages/js/`).
  Js,
  /// CSS examples with alternative style choices (`pages/css/`).
  Css,
  /// Tabbed examples backed by CSS example sources (`pages/tabbed/`).
  CssTabbed,
  /// Tabbed examples backed by HTML example sources (`pages/tabbed/`).
  HtmlTabbed,
  /// WebAssembly text examples (`pages/wat/`).
  Wat,
}

impl ExampleKind {
  /// Every kind, in the order resolvers are applied to a document.
  pub const ALL: [ExampleKind; 5] = [
    ExampleKind::Js,
    ExampleKind::Css,
    ExampleKind::CssTabbed,
    ExampleKind::HtmlTabbed,
    ExampleKind::Wat,
  ];

  /// Stable name used on the command line and in diagnostics.
  pub fn name(self) -> &'static str {
    match self {
      Self::Js => "js",
      Self::Css => "css",
      Self::CssTabbed => "css-tabbed",
      Self::HtmlTabbed => "html-tabbed",
      Self::Wat => "wat",
    }
  }

  /// Prefix a macro path must carry for this kind to handle it.
  pub fn path_prefix(self) -> &'static str {
    match self {
      Self::Js => "pages/js/",
      Self::Css => "pages/css/",
      Self::CssTabbed | Self::HtmlTabbed => "pages/tabbed/",
      Self::Wat => "pages/wat/",
    }
  }

  /// Directory below the live examples holding this kind's metadata, if restricted to one.
  pub fn metadata_family_dir(self) -> Option<&'static str> {
    match self {
      Self::Js => Some("js-examples"),
      Self::Css => Some("css-examples"),
      Self::CssTabbed | Self::HtmlTabbed => None,
      Self::Wat => Some("wat-examples"),
    }
  }

  /// Whether a metadata record belongs in this kind's map.
  pub fn accepts_record(self, record: &ExampleMetaRecord) -> bool {
    match self {
      Self::CssTabbed | Self::HtmlTabbed => record.kind.as_deref() == Some("tabbed"),
      _ => true,
    }
  }

  fn fragment_family(self) -> Option<&'static str> {
    match self {
      Self::Css | Self::CssTabbed => Some("css-examples"),
      Self::HtmlTabbed => Some("html-examples"),
      Self::Js | Self::Wat => None,
    }
  }

  fn primary_fragment(self, record: &ExampleMetaRecord) -> Option<&str> {
    match self {
      Self::Wat => record.wat_example_code.as_deref(),
      _ => record.example_code.as_deref(),
    }
  }

  fn title(self, title: &str) -> String {
    match self {
      Self::CssTabbed => title.replace("HTML Demo:", "CSS Demo:"),
      _ => title.to_string(),
    }
  }
}

impl fmt::Display for ExampleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Outcome of resolving one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// The invocation belongs to another kind and must be left untouched.
  NotApplicable,
  /// No metadata record exists for the named file; the invocation is left untouched.
  NotFound(String),
  /// The example was resolved and can be spliced.
  Resolved(ResolvedExample),
}

/// Resolves invocations of a single example kind against its metadata and fragment store.
#[derive(Debug, Clone)]
pub struct Resolver {
  kind: ExampleKind,
  metadata: MetadataMap,
  store: FragmentStore,
  legacy_host: String,
}

impl Resolver {
  /// Create a resolver for `kind`.
  pub fn new(
    kind: ExampleKind,
    metadata: MetadataMap,
    store: FragmentStore,
    legacy_host: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      metadata,
      store,
      legacy_host: legacy_host.into(),
    }
  }

  /// Kind handled by this resolver.
  pub fn kind(&self) -> ExampleKind {
    self.kind
  }

  /// Metadata records available to this resolver.
  pub fn metadata(&self) -> &MetadataMap {
    &self.metadata
  }

  /// Resolve an invocation into fragments.
  ///
  /// Prefix or fragment family mismatches yield [`Resolution::NotApplicable`]; unknown file
  /// names (or records lacking the kind's primary fragment) yield [`Resolution::NotFound`].
  /// Errors are reserved for problems that must abort the document.
  pub fn resolve(&self, invocation: &MacroInvocation<'_>) -> Result<Resolution, ResolveError> {
    let Some(file_name) = invocation.path.strip_prefix(self.kind.path_prefix()) else {
      return Ok(Resolution::NotApplicable);
    };

    let Some(record) = self.metadata.get(file_name) else {
      return Ok(Resolution::NotFound(file_name.to_string()));
    };
    let Some(primary) = self.kind.primary_fragment(record) else {
      return Ok(Resolution::NotFound(file_name.to_string()));
    };

    if let Some(family) = self.kind.fragment_family()
      && !primary.contains(family)
    {
      return Ok(Resolution::NotApplicable);
    }

    let mut assets = AssetPass::default();
    let fragments = match self.kind {
      ExampleKind::Js => vec![Fragment::new(
        FragmentRole::Script,
        assets.map(self.store.read(primary)?),
      )],
      ExampleKind::Css => self.css_fragments(record, primary, &mut assets)?,
      ExampleKind::CssTabbed | ExampleKind::HtmlTabbed => {
        self.tabbed_fragments(record, primary, &mut assets)?
      }
      ExampleKind::Wat => self.wat_fragments(record, primary, &mut assets)?,
    };

    Ok(Resolution::Resolved(ResolvedExample {
      title: self.kind.title(&record.title),
      fragments,
      extra_args: invocation.extra_args().to_string(),
      unmapped_assets: assets.unmapped,
    }))
  }

  fn css_fragments(
    &self,
    record: &ExampleMetaRecord,
    primary: &str,
    assets: &mut AssetPass,
  ) -> Result<Vec<Fragment>, ResolveError> {
    let html = self.store.read(primary)?;
    let path = self.store.root().join(primary);
    let markup = extract_css_example(&html).map_err(|source| ResolveError::Markup {
      path: path.clone(),
      source,
    })?;

    if markup.choices.is_empty() {
      return Err(ResolveError::MissingChoices { path });
    }
    let Some(default_example) = markup.default_example else {
      return Err(ResolveError::MissingSection { path });
    };

    let mut fragments: Vec<Fragment> = markup
      .choices
      .into_iter()
      .map(|choice| Fragment::new(FragmentRole::StyleChoice, assets.map(choice)))
      .collect();
    fragments.push(Fragment::new(FragmentRole::Markup, assets.map(default_example)));

    if let Some(stylesheet) = self.read_stylesheet(record, assets)? {
      fragments.push(stylesheet);
    }
    if let Some(script_path) = record.js_example_src.as_deref() {
      let script = self.store.read(script_path)?;
      let script = if references_legacy_assets(&script, &self.legacy_host) {
        assets.map(script)
      } else {
        script
      };
      fragments.push(Fragment::new(FragmentRole::Script, script));
    }

    Ok(fragments)
  }

  fn tabbed_fragments(
    &self,
    record: &ExampleMetaRecord,
    primary: &str,
    assets: &mut AssetPass,
  ) -> Result<Vec<Fragment>, ResolveError> {
    let mut fragments = vec![Fragment::new(
      FragmentRole::Markup,
      assets.map(self.store.read(primary)?),
    )];

    if let Some(stylesheet) = self.read_stylesheet(record, assets)? {
      fragments.push(stylesheet);
    }
    if let Some(script_path) = record.js_example_src.as_deref() {
      fragments.push(Fragment::new(
        FragmentRole::Script,
        assets.map(self.store.read(script_path)?),
      ));
    }

    Ok(fragments)
  }

  fn wat_fragments(
    &self,
    record: &ExampleMetaRecord,
    primary: &str,
    assets: &mut AssetPass,
  ) -> Result<Vec<Fragment>, ResolveError> {
    let module = assets.map(self.store.read(primary)?);
    let mut fragments = vec![Fragment::new(FragmentRole::WatModule, module.trim())];

    if let Some(script_path) = record.js_example_code.as_deref() {
      fragments.push(Fragment::new(
        FragmentRole::WatScript,
        assets.map(self.store.read(script_path)?),
      ));
    }

    Ok(fragments)
  }

  fn read_stylesheet(
    &self,
    record: &ExampleMetaRecord,
    assets: &mut AssetPass,
  ) -> Result<Option<Fragment>, ResolveError> {
    let Some(path) = record.css_example_src.as_deref() else {
      return Ok(None);
    };

    let stylesheet = self.store.read(path)?;
    let stylesheet = if references_stylesheet_assets(&stylesheet) {
      assets.map(stylesheet)
    } else {
      stylesheet
    };
    Ok(Some(Fragment::new(FragmentRole::Stylesheet, stylesheet)))
  }
}

// Collects unmapped references across every fragment of one example.
#[derive(Default)]
struct AssetPass {
  unmapped: Vec<String>,
}

impl AssetPass {
  fn map(&mut self, text: String) -> String {
    let rewrite = map_asset_references(&text);
    self.unmapped.extend(rewrite.unmapped);
    rewrite.text
  }
}
