//! Separable resampling of optional-sample grids
//!
//! Each axis is resampled independently. Shrinking an axis averages the covered
//! source cells weighted by overlap (area resampling); enlarging interpolates
//! linearly between the two nearest cell centres. A destination cell is undefined
//! when any source cell contributing a non-zero weight is undefined.

use ndarray::Array2;
use num_traits::Float;

use crate::io::configuration::WEIGHT_EPSILON;
use crate::spatial::grid::Grid;

/// Contribution of one source index to a destination index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Source index along the axis
    pub index: usize,
    /// Interpolation weight
    pub weight: f64,
}

/// Weights mapping `src_len` cells onto `dst_len` cells along one axis
///
/// Equal lengths give an exact copy, shorter destinations use area weights and
/// longer destinations use linear weights with half-pixel centres.
pub fn axis_taps(src_len: usize, dst_len: usize) -> Vec<Vec<Tap>> {
    if src_len == 0 {
        return vec![Vec::new(); dst_len];
    }
    if src_len == dst_len {
        return (0..dst_len)
            .map(|index| vec![Tap { index, weight: 1.0 }])
            .collect();
    }

    let ratio = src_len as f64 / dst_len as f64;
    if dst_len < src_len {
        (0..dst_len).map(|d| area_taps(d, ratio, src_len)).collect()
    } else {
        (0..dst_len).map(|d| linear_taps(d, ratio, src_len)).collect()
    }
}

fn area_taps(dst_index: usize, ratio: f64, src_len: usize) -> Vec<Tap> {
    let start = dst_index as f64 * ratio;
    let end = (start + ratio).min(src_len as f64);
    let first = start.floor() as usize;
    let last = (end.ceil() as usize).min(src_len);

    (first..last)
        .filter_map(|index| {
            let overlap = end.min(index as f64 + 1.0) - start.max(index as f64);
            let weight = overlap / ratio;
            (weight > WEIGHT_EPSILON).then_some(Tap { index, weight })
        })
        .collect()
}

fn linear_taps(dst_index: usize, ratio: f64, src_len: usize) -> Vec<Tap> {
    let max_index = (src_len - 1) as f64;
    let position = (dst_index as f64 + 0.5)
        .mul_add(ratio, -0.5)
        .clamp(0.0, max_index);
    let lower = position.floor();
    let frac = position - lower;
    let lower = lower as usize;
    let upper = (lower + 1).min(src_len - 1);

    if frac <= WEIGHT_EPSILON || lower == upper {
        return vec![Tap {
            index: lower,
            weight: 1.0,
        }];
    }
    if frac >= 1.0 - WEIGHT_EPSILON {
        return vec![Tap {
            index: upper,
            weight: 1.0,
        }];
    }
    vec![
        Tap {
            index: lower,
            weight: 1.0 - frac,
        },
        Tap {
            index: upper,
            weight: frac,
        },
    ]
}

/// Weighted sum of samples, undefined if any contributing sample is undefined
pub fn combine<T, F>(taps: &[Tap], sample: F) -> Option<T>
where
    T: Float,
    F: Fn(usize) -> Option<T>,
{
    if taps.is_empty() {
        return None;
    }
    taps.iter().try_fold(T::zero(), |acc, tap| {
        let value = sample(tap.index)?;
        let weight = T::from(tap.weight)?;
        Some(value.mul_add(weight, acc))
    })
}

/// Resize a grid to exactly `rows` x `cols`
pub fn resize<T: Float>(grid: &Grid<T>, rows: usize, cols: usize) -> Grid<T> {
    let (src_rows, src_cols) = grid.dim();
    if (src_rows, src_cols) == (rows, cols) {
        return grid.clone();
    }

    let col_taps = axis_taps(src_cols, cols);
    let row_taps = axis_taps(src_rows, rows);

    let horizontal = Array2::from_shape_fn((src_rows, cols), |(row, col)| {
        col_taps.get(col).and_then(|taps| {
            combine(taps, |index| grid.get((row, index)).copied().flatten())
        })
    });

    Array2::from_shape_fn((rows, cols), |(row, col)| {
        row_taps.get(row).and_then(|taps| {
            combine(taps, |index| horizontal.get((index, col)).copied().flatten())
        })
    })
}
