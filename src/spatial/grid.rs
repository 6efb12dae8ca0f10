//! Dense sample grids with explicit undefined cells
//!
//! Samples are `Option<T>`: `None` marks a cell with no observed value. Floating
//! point NaN only appears at the I/O boundary and is converted on the way in and out.

use ndarray::Array2;
use num_traits::Float;

/// Dense 2D grid of optional samples, indexed `[row, col]`
pub type Grid<T> = Array2<Option<T>>;

/// Kind of measurement carried by a source or canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// 8-bit luminance; undefined cells export as 0
    Intensity,
    /// Floating point height or depth; undefined cells export as NaN
    Height,
}

impl SampleKind {
    /// Kind of a merged canvas: intensity only when every source is intensity
    pub fn merged<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        if kinds.into_iter().all(|kind| kind == Self::Intensity) {
            Self::Intensity
        } else {
            Self::Height
        }
    }
}

/// Wrap a sample, mapping NaN to undefined
pub fn defined<T: Float>(value: T) -> Option<T> {
    (!value.is_nan()).then_some(value)
}

/// Build a grid from dense values, mapping NaN to undefined
pub fn from_dense<T: Float>(values: &Array2<T>) -> Grid<T> {
    values.mapv(defined)
}

/// Flatten a grid to dense values, substituting `fill` for undefined cells
pub fn to_dense<T: Float>(grid: &Grid<T>, fill: T) -> Array2<T> {
    grid.mapv(|sample| sample.unwrap_or(fill))
}

/// Number of defined cells
pub fn defined_count<T>(grid: &Grid<T>) -> usize {
    grid.iter().filter(|sample| sample.is_some()).count()
}

/// Smallest and largest defined sample, if any
pub fn value_range<T: Float>(grid: &Grid<T>) -> Option<(T, T)> {
    grid.iter().flatten().fold(None, |range, &value| match range {
        None => Some((value, value)),
        Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
    })
}
