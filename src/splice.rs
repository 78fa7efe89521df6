//! Rendering of resolved examples into `{{InteractiveExample}}` blocks.

use crate::models::ResolvedExample;

/// Name of the presentational macro emitted in place of the embed macro.
pub const INTERACTIVE_EXAMPLE_MACRO: &str = "InteractiveExample";

/// Renders replacement text for resolved invocations.
#[derive(Debug, Clone)]
pub struct Splicer {
  store_marker: String,
}

impl Splicer {
  /// Create a splicer that drops suffixes mentioning `store_marker`.
  pub fn new(store_marker: impl Into<String>) -> Self {
    Self {
      store_marker: store_marker.into(),
    }
  }

  /// Produce the replacement for one invocation.
  ///
  /// The header, each fenced block and the preserved suffix are separated by exactly one
  /// blank line, whichever fragments are present.
  pub fn splice(&self, resolved: &ResolvedExample, original_suffix: &str) -> String {
    let mut sections = vec![render_header(resolved)];

    let mut fragments: Vec<_> = resolved.fragments.iter().collect();
    fragments.sort_by_key(|fragment| fragment.role);
    sections.extend(fragments.into_iter().map(|fragment| {
      format!(
        "```{} {}\n{}\n```",
        fragment.role.language(),
        fragment.role.block_marker(),
        fragment.code.trim_end()
      )
    }));

    let suffix = original_suffix.trim();
    if self.keeps_suffix(suffix) {
      sections.push(suffix.to_string());
    }

    sections.join("\n\n")
  }

  fn keeps_suffix(&self, suffix: &str) -> bool {
    !suffix.is_empty() && (self.store_marker.is_empty() || !suffix.contains(&self.store_marker))
  }
}

fn render_header(resolved: &ResolvedExample) -> String {
  let title = escape_html(&resolved.title);
  if resolved.extra_args.is_empty() {
    format!("{{{{{INTERACTIVE_EXAMPLE_MACRO}(\"{title}\")}}}}")
  } else {
    format!(
      "{{{{{INTERACTIVE_EXAMPLE_MACRO}(\"{title}\", {})}}}}",
      resolved.extra_args
    )
  }
}

/// Escape a title for use inside the macro's quoted argument.
pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#x27;"),
      _ => escaped.push(ch),
    }
  }
  escaped
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{Fragment, FragmentRole};
  use pretty_assertions::assert_eq;

  fn splicer() -> Splicer {
    Splicer::new("interactive-examples")
  }

  fn example(fragments: Vec<Fragment>) -> ResolvedExample {
    ResolvedExample {
      title: "Array.filter".into(),
      fragments,
      extra_args: String::new(),
      unmapped_assets: Vec::new(),
    }
  }

  #[test]
  fn renders_single_script_block() {
    let resolved = example(vec![Fragment::new(FragmentRole::Script, "console.log(1)")]);
    assert_eq!(
      splicer().splice(&resolved, ""),
      "{{InteractiveExample(\"Array.filter\")}}\n\n```js interactive-example\nconsole.log(1)\n```"
    );
  }

  #[test]
  fn orders_blocks_by_role_and_trims_trailing_whitespace() {
    let resolved = ResolvedExample {
      title: "CSS Demo: color".into(),
      fragments: vec![
        Fragment::new(FragmentRole::Script, "run();\n\n"),
        Fragment::new(FragmentRole::Markup, "  <div id=\"example-element\"></div>\n"),
        Fragment::new(FragmentRole::StyleChoice, "color: red;"),
        Fragment::new(FragmentRole::StyleChoice, "color: blue;"),
        Fragment::new(FragmentRole::Stylesheet, "#example-element {}\n"),
      ],
      extra_args: "\"taller\"".into(),
      unmapped_assets: Vec::new(),
    };

    let expected = r#"{{InteractiveExample("CSS Demo: color", "taller")}}

```css interactive-example-choice
color: red;
```

```css interactive-example-choice
color: blue;
```

```html interactive-example
  <div id="example-element"></div>
```

```css interactive-example
#example-element {}
```

```js interactive-example
run();
```"#;
    assert_eq!(splicer().splice(&resolved, ""), expected);
  }

  #[test]
  fn spacing_does_not_depend_on_missing_fragments() {
    let resolved = ResolvedExample {
      title: "WebAssembly Demo".into(),
      fragments: vec![Fragment::new(FragmentRole::WatModule, "(module)")],
      extra_args: String::new(),
      unmapped_assets: Vec::new(),
    };
    assert_eq!(
      splicer().splice(&resolved, "  See also below.  "),
      "{{InteractiveExample(\"WebAssembly Demo\")}}\n\n```wat interactive-example\n(module)\n```\n\nSee also below."
    );
  }

  #[test]
  fn drops_suffix_mentioning_the_fragment_store() {
    let resolved = example(vec![Fragment::new(FragmentRole::Script, "x")]);
    let spliced = splicer().splice(
      &resolved,
      "<!-- source: https://github.com/mdn/interactive-examples -->",
    );
    assert!(spliced.ends_with("```"));
    assert!(!spliced.contains("interactive-examples"));
  }

  #[test]
  fn escapes_title_quotes_and_markup() {
    assert_eq!(
      escape_html(r#"HTML Demo: <a href="x"> & 'y'"#),
      "HTML Demo: &lt;a href=&quot;x&quot;&gt; &amp; &#x27;y&#x27;"
    );
    let resolved = ResolvedExample {
      title: "HTML Demo: <abbr>".into(),
      fragments: Vec::new(),
      extra_args: "\"tabbed-shorter\"".into(),
      unmapped_assets: Vec::new(),
    };
    assert_eq!(
      splicer().splice(&resolved, ""),
      "{{InteractiveExample(\"HTML Demo: &lt;abbr&gt;\", \"tabbed-shorter\")}}"
    );
  }
}
