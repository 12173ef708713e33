//! create-astro-exe scaffolds a new Astro application.
//! It collects project metadata, materializes a template directory with
//! placeholder substitution, and optionally installs dependencies and
//! initializes a git repository.

/// Command-line interface module
pub mod cli;

/// Materialization rules for a template
/// Supports JSON and YAML rule files (scaffold.json, scaffold.yml, scaffold.yaml)
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Ignore patterns applied while walking a template
pub mod ignore;

/// Preloaded answers read from stdin
pub mod parser;

/// Template tree materialization
pub mod processor;

/// Project creation flow
pub mod project;

/// User input and interaction handling
pub mod prompt;

/// External command execution
pub mod runner;

/// Placeholder substitution
pub mod template;
