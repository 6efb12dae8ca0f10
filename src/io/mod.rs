//! Input/output surfaces around the alignment core

/// Command-line parsing and the batch pipeline
pub mod cli;
/// Constants and runtime options
pub mod configuration;
/// Error types and path context
pub mod error;
/// Source discovery and decoding
pub mod loader;
/// Tracing subscriber setup
pub mod logging;
/// Offset mapping sidecar
pub mod offsets;
/// Blended preview export
pub mod preview;
/// Stage progress display
pub mod progress;
/// Table input and canvas export
pub mod table;
