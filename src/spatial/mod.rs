//! Spatial data structures and grid construction
//!
//! This module contains spatial-related functionality including:
//! - Optional-sample grids and conversions
//! - Densification of coordinate listings
//! - Footprint and canvas geometry

/// Conversion of coordinate triples into dense grids
pub mod densify;
/// Source footprints and the shared canvas bounds
pub mod footprint;
/// Optional-sample grid type and helpers
pub mod grid;

pub use grid::{Grid, SampleKind};
