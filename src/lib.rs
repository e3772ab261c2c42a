//! Kiln is a static site builder.
//! It mirrors a source tree into an output tree, evaluating `${ ... }`
//! expressions in templated files and copying everything else verbatim.

/// Build session validation and tree mirroring
pub mod builder;

/// Name-based classification of source entries
/// Decides between directory, excluded, templated and opaque
pub mod classifier;

/// Command-line interface module for the Kiln application
pub mod cli;

/// Site configuration handling
/// Supports JSON and YAML formats (kiln.json, kiln.yml, kiln.yaml)
pub mod config;

/// Common constants and reserved identifiers
pub mod constants;

/// Error types and handling for the Kiln application
pub mod error;

/// Filesystem helpers used when applying file operations
pub mod ioutils;

/// Logger initialisation for the binary
pub mod logger;

/// Per-entry processing of the source tree
pub mod processor;

/// Expression evaluation and the inclusion helpers
pub mod renderer;
