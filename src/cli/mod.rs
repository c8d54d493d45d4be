//! Command Line Interface (CLI) layer for docfill.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that validates the arguments,
//! builds the tag mapping and renders the template. If you are embedding
//! docfill into another application, prefer the `docfill::api` module.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use errors::AppError;
pub use runner::run;
