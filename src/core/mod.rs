//! Core data structures for autorecipe.
//!
//! This module contains the foundational types used throughout autorecipe:
//! - Recipe definitions and references
//! - Options, settings, and the package id derived from them
//! - The lifecycle state and the error type every phase returns

pub mod errors;
pub mod options;
pub mod package_id;
pub mod recipe;
pub mod reference;
pub mod settings;
pub mod state;

pub use errors::RecipeError;
pub use options::{OptionDecl, OptionSet, OptionValue};
pub use package_id::PackageId;
pub use recipe::RecipeDef;
pub use reference::RecipeRef;
pub use settings::Settings;
pub use state::RecipeState;
