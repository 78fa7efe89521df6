/// Substring present in every legacy media reference.
const MEDIA_HINT: &str = "media/";

/// Function call token marking an asset reference inside a stylesheet.
const STYLESHEET_ASSET_HINT: &str = "url(";

/// Returns `true` when the text could contain a legacy media reference at all.
pub fn mentions_media(text: &str) -> bool {
    text.contains(MEDIA_HINT)
}

/// Determine whether a stylesheet fragment references any asset through `url(...)`.
pub fn references_stylesheet_assets(text: &str) -> bool {
    text.contains(STYLESHEET_ASSET_HINT)
}

/// Determine whether a script fragment references legacy media or the legacy examples host.
pub fn references_legacy_assets(text: &str, legacy_host: &str) -> bool {
    mentions_media(text) || (!legacy_host.is_empty() && text.contains(legacy_host))
}
