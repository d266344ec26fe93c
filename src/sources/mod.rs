//! Recipe sources.
//!
//! Sources are downloaded as tarballs, extracted into the working directory,
//! patched, and completed with placeholder files before configuration.

pub mod acquire;
pub mod fetch;
pub mod patch;
pub mod template;

pub use acquire::{source_url, SourceAcquirer};
pub use fetch::{Fetcher, HttpFetcher};
pub use patch::{apply_patches, replace_in_str, Patch};
pub use template::{render, TemplateVars};
