//! Alignment and merging of multi-resolution measurement surfaces
//!
//! Sources (8-bit images, floating-point depth images or coordinate tables) are
//! normalised to the finest resolution in the batch, rotated about their own
//! centre, placed at caller-supplied offsets and stacked into one multi-channel
//! canvas that can be exported as a flat coordinate table.

#![forbid(unsafe_code)]

/// Canvas composition and channel blending
pub mod algorithm;
/// Input/output operations, configuration and error handling
pub mod io;
/// Resampling and rotation of sample grids
pub mod math;
/// Sample grids, densification and footprint geometry
pub mod spatial;

pub use algorithm::compositor::{Canvas, Compositor, SourceRecord};
pub use io::error::{AlignError, Result};
