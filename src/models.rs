//! Data structures shared between metadata loading, resolution and splicing.

use serde::Deserialize;

/// Metadata describing a single interactive example, as authored in a `meta.json` document.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExampleMetaRecord {
  /// Identifier referenced by macro invocations (e.g. `array-filter.html`).
  pub file_name: String,
  /// Human readable title rendered by the presentational macro.
  pub title: String,
  /// Example type tag such as `tabbed` or `js`.
  #[serde(rename = "type", default)]
  pub kind: Option<String>,
  /// Primary fragment: combined markup, or the script for JavaScript examples.
  #[serde(default)]
  pub example_code: Option<String>,
  /// Dedicated stylesheet fragment.
  #[serde(default)]
  pub css_example_src: Option<String>,
  /// Dedicated script fragment.
  #[serde(default)]
  pub js_example_src: Option<String>,
  /// WebAssembly text fragment.
  #[serde(default)]
  pub wat_example_code: Option<String>,
  /// Script accompanying a WebAssembly text fragment.
  #[serde(default)]
  pub js_example_code: Option<String>,
}

/// Role of a fragment within the spliced output. The declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FragmentRole {
  /// One of several alternative stylesheet snippets.
  StyleChoice,
  /// Combined or primary markup.
  Markup,
  /// Dedicated stylesheet.
  Stylesheet,
  /// Dedicated script.
  Script,
  /// WebAssembly text module.
  WatModule,
  /// Script driving a WebAssembly text module.
  WatScript,
}

impl FragmentRole {
  /// Language identifier written after the opening fence.
  pub fn language(self) -> &'static str {
    match self {
      Self::StyleChoice | Self::Stylesheet => "css",
      Self::Markup => "html",
      Self::Script | Self::WatScript => "js",
      Self::WatModule => "wat",
    }
  }

  /// Block marker distinguishing the canonical example from alternative choices.
  pub fn block_marker(self) -> &'static str {
    match self {
      Self::StyleChoice => "interactive-example-choice",
      _ => "interactive-example",
    }
  }
}

/// A piece of example source ready to be written into a fenced block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
  /// Role deciding the language tag and position of the block.
  pub role: FragmentRole,
  /// Source text of the fragment.
  pub code: String,
}

impl Fragment {
  /// Create a fragment for the given role.
  pub fn new(role: FragmentRole, code: impl Into<String>) -> Self {
    Self {
      role,
      code: code.into(),
    }
  }
}

/// Example resolved from a macro invocation, ready for splicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExample {
  /// Unescaped title of the example.
  pub title: String,
  /// Resolved fragments, in any order.
  pub fragments: Vec<Fragment>,
  /// Extra macro arguments passed through verbatim (already stripped of the leading comma).
  pub extra_args: String,
  /// Legacy media references left unmapped in the fragments, one per occurrence.
  pub unmapped_assets: Vec<String>,
}
