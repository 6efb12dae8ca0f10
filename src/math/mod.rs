//! Numerical kernels for grid transformation

/// Area and linear resampling of optional-sample grids
pub mod resample;
/// Rotation of grids about their centre
pub mod rotation;
