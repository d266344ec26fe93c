//! autorecipe - declarative build recipes for autotools-based C libraries
//!
//! This crate provides the recipe execution engine: option resolution,
//! source acquisition and patching, memoized autotools configuration,
//! building, and packaging with consumer metadata.

pub mod builder;
pub mod core;
pub mod ops;
pub mod recipes;
pub mod sources;
pub mod util;

/// Test utilities and mocks for autorecipe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations for process execution
/// and archive downloads.
#[cfg(test)]
pub mod test_support;

pub use core::{
    errors::RecipeError, options::OptionSet, package_id::PackageId, recipe::RecipeDef,
    reference::RecipeRef, settings::Settings, state::RecipeState,
};

pub use ops::{PackageMetadata, Recipe};
pub use util::context::GlobalContext;
