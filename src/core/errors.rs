//! Recipe error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::state::RecipeState;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error raised by any recipe phase.
///
/// Every variant is fatal: the run stops at the first failing phase.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum RecipeError {
    #[error("`{recipe}` does not support platform `{os}`")]
    #[diagnostic(code(autorecipe::configure::unsupported_platform))]
    UnsupportedPlatform {
        recipe: String,
        os: String,
        supported: Vec<String>,
    },

    #[error("invalid value `{value}` for option `{name}`")]
    #[diagnostic(code(autorecipe::configure::invalid_option))]
    InvalidOption {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unknown option `{name}`")]
    #[diagnostic(code(autorecipe::configure::unknown_option))]
    UnknownOption { name: String, known: Vec<String> },

    #[error("invalid recipe `{recipe}`: {message}")]
    #[diagnostic(code(autorecipe::recipe::invalid))]
    InvalidRecipe { recipe: String, message: String },

    #[error("failed to fetch `{url}`: {message}")]
    #[diagnostic(
        code(autorecipe::source::fetch),
        help("check your network connection, or disable `[net] offline`")
    )]
    Fetch { url: String, message: String },

    #[error("unexpected source layout at `{}`: {reason}", .path.display())]
    #[diagnostic(code(autorecipe::source::layout))]
    Layout { path: PathBuf, reason: String },

    #[error("patch target not found in `{}`: `{needle}`", .file.display())]
    #[diagnostic(code(autorecipe::source::patch_target_not_found))]
    PatchTargetNotFound { file: PathBuf, needle: String },

    #[error("failed to apply patch `{}`: {message}", .patch.display())]
    #[diagnostic(code(autorecipe::source::patch_apply))]
    PatchApply { patch: PathBuf, message: String },

    #[error("configure step `{command}` failed")]
    #[diagnostic(code(autorecipe::toolchain::configure))]
    Configure {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("build step `{command}` failed")]
    #[diagnostic(code(autorecipe::build::failed))]
    Build {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("cannot run `{operation}` while recipe is {state}")]
    #[diagnostic(code(autorecipe::lifecycle::sequence))]
    Sequence {
        operation: &'static str,
        state: RecipeState,
    },

    #[error("failed to install system package `{package}`: {message}")]
    #[diagnostic(code(autorecipe::system::package))]
    SystemPackage { package: String, message: String },

    #[error("{context}")]
    #[diagnostic(code(autorecipe::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RecipeError {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        RecipeError::Io {
            context: context.into(),
            source,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());

        match self {
            RecipeError::UnsupportedPlatform { supported, .. } => diag
                .with_context(format!("supported platforms: {}", supported.join(", ")))
                .with_suggestion("Pass --platform only for a platform the recipe supports"),

            RecipeError::InvalidOption { name, allowed, .. } => diag
                .with_context(format!("`{}` accepts: {}", name, allowed.join(", ")))
                .with_suggestion(format!("Use `-o {}=<value>` with one of the values above", name)),

            RecipeError::UnknownOption { known, .. } => diag
                .with_context(format!("declared options: {}", known.join(", ")))
                .with_suggestion("Run `autorecipe show <recipe>` to list its options"),

            RecipeError::InvalidRecipe { .. } => diag,

            RecipeError::Fetch { .. } => diag.with_suggestion(suggestions::FETCH_FAILED),

            RecipeError::Layout { path, .. } => diag
                .with_location(path)
                .with_suggestion(suggestions::STALE_CHECKOUT),

            RecipeError::PatchTargetNotFound { file, .. } => diag
                .with_location(file)
                .with_context("the upstream sources no longer match the recipe's patch set"),

            RecipeError::PatchApply { .. } => {
                diag.with_context("the patch does not apply cleanly to the extracted sources")
            }

            RecipeError::Configure { status, stderr, .. }
            | RecipeError::Build { status, stderr, .. } => {
                let mut diag = diag.with_context(match status {
                    Some(code) => format!("exited with status {}", code),
                    None => "terminated by a signal".to_string(),
                });
                if let Some(line) = stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                    diag = diag.with_context(line.trim().to_string());
                }
                diag.with_suggestion(suggestions::BUILD_FAILED)
            }

            RecipeError::Sequence { .. } => diag.with_context(
                "phases run in order: source, build, package, package_info",
            ),

            RecipeError::SystemPackage { .. } => diag
                .with_suggestion("Install the package manually")
                .with_suggestion("Set `[system] install_packages = false` to skip this step"),

            RecipeError::Io { source, .. } => diag.with_context(source.to_string()),
        }
    }
}
