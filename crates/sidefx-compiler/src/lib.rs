//! Sidefx: side-effect analysis for a small D-like language.
//!
//! Parses source text, lowers it to a typed expression arena and checks every
//! expression whose value is discarded: effect-free statements are errors,
//! discarded results of strongly pure nothrow calls are warnings.
//!
//! # Example
//!
//! ```
//! use sidefx_compiler::ModuleAnalyzed;
//!
//! let source = r#"
//!     void main() { int a; int b; a + b; }
//! "#;
//!
//! let module = ModuleAnalyzed::try_from(source).expect("out of fuel");
//! assert!(!module.is_valid());
//! eprintln!("{}", module.diagnostics().render(source));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod diagnostics;
pub mod module;
pub mod ops;
pub mod parser;
pub mod sema;

mod dump;

#[cfg(test)]
mod module_tests;
#[cfg(test)]
pub(crate) mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Each pass returns its typed output alongside any diagnostics it collected.
/// Fatal errors (like fuel exhaustion) use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use diagnostics::{
    DiagnosticContext, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity, WarningMode,
};
pub use module::{ModuleAnalyzed, ModuleBuilder, ModuleConfig, ModuleParsed};

/// Errors that can occur while building a module.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("parsing failed with {} errors", .0.error_count())]
    ParseFailed(Diagnostics),

    #[error("analysis failed with {} errors", .0.error_count())]
    AnalysisFailed(Diagnostics),
}

/// Result type for module operations.
pub type Result<T> = std::result::Result<T, Error>;
