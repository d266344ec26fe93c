//! High-level operations.
//!
//! This module contains the recipe lifecycle and the implementation of
//! autorecipe commands.

pub mod create;
pub mod lifecycle;
pub mod package;
pub mod system_requirements;

pub use create::{create, CreateOptions};
pub use lifecycle::Recipe;
pub use package::{collect_metadata, PackageMetadata};
pub use system_requirements::{detect_distro, SystemOptions, SystemPackageTool};
