//! Locate `{{EmbedInteractiveExample(...)}}` invocations within a document.

use std::ops::Range;
use std::sync::OnceLock;

use regex::{CaptureMatches, Regex};

fn embed_macro_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  // `R` keeps `\r` out of the suffix so CRLF documents keep their line endings.
  PATTERN.get_or_init(|| {
    Regex::new(r#"(?mR)^\{\{EmbedInteractiveExample\("([^"]+)"([^}]*)\)\}\}(.*)$"#)
      .expect("invalid embed macro regex")
  })
}

/// A single line-anchored macro invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
  /// Byte range of the invocation line (excluding the line terminator).
  pub span: Range<usize>,
  /// Quoted path argument, e.g. `pages/js/array-filter.html`.
  pub path: &'a str,
  /// Remainder of the argument list after the path, as written.
  pub raw_extra_args: &'a str,
  /// Remainder of the line after the closing braces, as written.
  pub raw_suffix: &'a str,
}

impl<'a> MacroInvocation<'a> {
  /// Matched source text of the whole invocation.
  pub fn source<'d>(&self, document: &'d str) -> &'d str {
    &document[self.span.clone()]
  }

  /// Extra arguments with the separating comma and surrounding whitespace removed.
  pub fn extra_args(&self) -> &'a str {
    self.raw_extra_args.trim_start_matches(',').trim()
  }

  /// Trailing line content with surrounding whitespace removed.
  pub fn suffix(&self) -> &'a str {
    self.raw_suffix.trim()
  }
}

/// Lazy iterator over the invocations of a document, in document order.
pub struct MacroInvocations<'a> {
  document: &'a str,
  matches: CaptureMatches<'static, 'a>,
}

impl<'a> MacroInvocations<'a> {
  /// Start a fresh scan from the beginning of the same document.
  pub fn restart(&self) -> MacroInvocations<'a> {
    find_macro_invocations(self.document)
  }
}

impl<'a> Iterator for MacroInvocations<'a> {
  type Item = MacroInvocation<'a>;

  fn next(&mut self) -> Option<Self::Item> {
    let caps = self.matches.next()?;
    let whole = caps.get(0)?;
    Some(MacroInvocation {
      span: whole.range(),
      path: caps.get(1).map_or("", |m| m.as_str()),
      raw_extra_args: caps.get(2).map_or("", |m| m.as_str()),
      raw_suffix: caps.get(3).map_or("", |m| m.as_str()),
    })
  }
}

/// Find every `{{EmbedInteractiveExample("PATH"...)}}` invocation anchored at a line start.
pub fn find_macro_invocations(document: &str) -> MacroInvocations<'_> {
  MacroInvocations {
    document,
    matches: embed_macro_pattern().captures_iter(document),
  }
}
