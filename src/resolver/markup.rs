//! Extraction of style choices and the default-example section from CSS example markup.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

const DEFAULT_EXAMPLE_ID: &str = "default-example";
const STYLE_CHOICE_CLASS: &str = "language-css";

/// Pieces of a CSS example's markup fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssExampleMarkup {
  /// Text of every `code.language-css` element, entity-decoded and trimmed.
  pub choices: Vec<String>,
  /// The `section#default-example` element, dedented to its own indentation.
  pub default_example: Option<String>,
}

struct OpenElement {
  start: usize,
  depth: usize,
}

/// Scan HTML markup for style choices and the default-example section.
///
/// Only `section` and `code` tags are tracked, so void or unclosed elements elsewhere in the
/// markup do not disturb the result.
pub fn extract_css_example(html: &str) -> Result<CssExampleMarkup, quick_xml::Error> {
  let mut reader = Reader::from_str(html);
  {
    let config = reader.config_mut();
    config.trim_text_start = false;
    config.trim_text_end = false;
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
  }

  let mut markup = CssExampleMarkup::default();
  let mut section: Option<OpenElement> = None;
  let mut choice: Option<OpenElement> = None;

  loop {
    let event_start = reader.buffer_position() as usize;
    let event = reader.read_event()?;
    let event_end = reader.buffer_position() as usize;

    match event {
      Event::Start(tag) => match tag.local_name().as_ref() {
        b"section" => {
          if let Some(open) = section.as_mut() {
            open.depth += 1;
          } else if markup.default_example.is_none() && has_id(&tag, DEFAULT_EXAMPLE_ID) {
            section = Some(OpenElement {
              start: tag_start(html, event_start),
              depth: 1,
            });
          }
        }
        b"code" => {
          if let Some(open) = choice.as_mut() {
            open.depth += 1;
          } else if has_class(&tag, STYLE_CHOICE_CLASS) {
            choice = Some(OpenElement {
              start: event_end,
              depth: 1,
            });
          }
        }
        _ => {}
      },
      Event::End(tag) => match tag.local_name().as_ref() {
        b"section" => {
          if let Some(open) = section.as_mut() {
            open.depth -= 1;
            if open.depth == 0 {
              markup.default_example = Some(dedent_element(html, open.start, event_end));
              section = None;
            }
          }
        }
        b"code" => {
          if let Some(open) = choice.as_mut() {
            open.depth -= 1;
            if open.depth == 0 {
              let close = closing_tag_start(html, event_end).max(open.start);
              markup.choices.push(decode_text(&html[open.start..close]));
              choice = None;
            }
          }
        }
        _ => {}
      },
      Event::Eof => break,
      _ => {}
    }
  }

  Ok(markup)
}

fn has_id(tag: &BytesStart<'_>, id: &str) -> bool {
  tag
    .html_attributes()
    .flatten()
    .any(|attr| attr.key.as_ref() == b"id" && attr.value.as_ref() == id.as_bytes())
}

fn has_class(tag: &BytesStart<'_>, class: &str) -> bool {
  tag.html_attributes().flatten().any(|attr| {
    attr.key.as_ref() == b"class"
      && std::str::from_utf8(&attr.value)
        .is_ok_and(|value| value.split_whitespace().any(|candidate| candidate == class))
  })
}

// Offset of the `<` opening the tag whose event started at `position`.
fn tag_start(html: &str, position: usize) -> usize {
  html
    .get(..=position)
    .and_then(|head| head.rfind('<'))
    .unwrap_or(position)
}

// Offset of the `</` closing the tag that ends at `end`.
fn closing_tag_start(html: &str, end: usize) -> usize {
  html.get(..end).and_then(|head| head.rfind("</")).unwrap_or(end)
}

fn decode_text(raw: &str) -> String {
  let decoded = unescape(raw).map(|text| text.into_owned()).unwrap_or_else(|_| raw.to_string());
  decoded.trim().to_string()
}

fn dedent_element(html: &str, start: usize, end: usize) -> String {
  let element = &html[start..end];
  let line_start = html[..start].rfind('\n').map_or(0, |index| index + 1);
  let indent = &html[line_start..start];
  if indent.is_empty() || !indent.chars().all(|c| c == ' ' || c == '\t') {
    return element.to_string();
  }

  element
    .split('\n')
    .enumerate()
    .map(|(index, line)| {
      if index == 0 {
        line
      } else {
        line.strip_prefix(indent).unwrap_or(line)
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}
