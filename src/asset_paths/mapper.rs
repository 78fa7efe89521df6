use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::warn;

use super::filters::mentions_media;
use super::table::canonical_asset_path;

/// Relative prefix treated as equivalent to the site root.
const ROOT_EQUIVALENT_PREFIX: &str = "../..";

fn legacy_reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([./]*)(/media/\S*)(["'])"#).expect("invalid legacy media regex")
    })
}

/// Output of a media rewriting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRewrite {
    /// Text with every known legacy reference replaced.
    pub text: String,
    /// References that had no table entry, in order of appearance, one per occurrence.
    pub unmapped: Vec<String>,
}

/// Replace legacy `/media/...` references that are followed by a quote character.
///
/// Only the `/media/...` segment is swapped for its canonical path: any leading `./` or `../`
/// run and the closing quote are kept as written. A `../..` prefix is looked up as if the
/// reference were rooted. Unknown references are left untouched and reported through the
/// returned [`AssetRewrite::unmapped`] list as well as a `warn` diagnostic.
pub fn map_asset_references(text: &str) -> AssetRewrite {
    if !mentions_media(text) {
        return AssetRewrite {
            text: text.to_string(),
            unmapped: Vec::new(),
        };
    }

    let mut unmapped = Vec::new();
    let rewritten = legacy_reference_pattern()
        .replace_all(text, |caps: &Captures| {
            let prefix = &caps[1];
            let segment = &caps[2];
            let quote = &caps[3];

            let reference = format!("{prefix}{segment}");
            let key = reference
                .strip_prefix(ROOT_EQUIVALENT_PREFIX)
                .unwrap_or(&reference);

            match canonical_asset_path(key) {
                Some(canonical) => format!("{prefix}{canonical}{quote}"),
                None => {
                    warn!(reference = %reference, "unmapped legacy media reference");
                    unmapped.push(reference.clone());
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    AssetRewrite {
        text: rewritten,
        unmapped,
    }
}
