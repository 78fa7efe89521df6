//! Helpers for rewriting legacy media references to their shared-assets location.
//!
//! The table of known paths, the cheap textual indicators used to decide whether a fragment is
//! worth scanning, and the rewriting pass itself live in separate submodules so each can be
//! tested on its own.

mod filters;
mod mapper;
mod table;

pub use filters::{mentions_media, references_legacy_assets, references_stylesheet_assets};
pub use mapper::{AssetRewrite, map_asset_references};
pub use table::{asset_mapping_table, canonical_asset_path};
