#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod invocation;
pub mod metadata;
pub mod models;
pub mod resolver;
pub mod rewriter;
pub mod splice;

pub use config::MigrationConfig;
pub use invocation::{MacroInvocation, find_macro_invocations};
pub use metadata::{MetadataError, MetadataMap};
pub use resolver::{ExampleKind, FragmentStore, Resolution, ResolveError, Resolver};
pub use rewriter::{ContentRewrite, DocumentOutcome, DocumentRewrite, DocumentRewriter, RewriteReport};
pub use splice::Splicer;
