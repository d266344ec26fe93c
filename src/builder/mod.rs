//! Build drivers.
//!
//! Recipes configure and build their sources with autotools; the driver here
//! turns a recipe's configure table and resolved options into process
//! invocations.

pub mod autotools;

pub use autotools::{configure_args, configure_env, AutotoolsBuilder, ToolchainHandle};
