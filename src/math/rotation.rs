//! Rigid rotation of grids about their own centre
//!
//! Uses inverse mapping: every destination cell looks up its rotated position in
//! the source and interpolates bilinearly. Positions outside the source grid and
//! interpolations touching undefined cells produce undefined samples.

use ndarray::Array2;
use num_traits::Float;

use crate::io::configuration::{BOUNDS_EPSILON, WEIGHT_EPSILON};
use crate::math::resample::Tap;
use crate::spatial::grid::Grid;

/// Rotate a grid by `angle_degrees` about its centre, keeping its shape
///
/// The pivot is `((cols - 1) / 2, (rows - 1) / 2)`. Positive angles rotate
/// counter-clockwise as displayed, with rows growing downwards.
pub fn rotate<T: Float>(grid: &Grid<T>, angle_degrees: f64) -> Grid<T> {
    if angle_degrees % 360.0 == 0.0 {
        return grid.clone();
    }

    let (rows, cols) = grid.dim();
    let center_x = (cols as f64 - 1.0) / 2.0;
    let center_y = (rows as f64 - 1.0) / 2.0;
    let (sin, cos) = angle_degrees.to_radians().sin_cos();

    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let dx = col as f64 - center_x;
        let dy = row as f64 - center_y;
        let source_x = cos.mul_add(dx, -sin * dy) + center_x;
        let source_y = sin.mul_add(dx, cos * dy) + center_y;
        sample_bilinear(grid, source_y, source_x)
    })
}

/// Bilinear sample at fractional `(y, x)`, undefined outside the grid
pub fn sample_bilinear<T: Float>(grid: &Grid<T>, y: f64, x: f64) -> Option<T> {
    let (rows, cols) = grid.dim();
    let (row_taps, col_taps) = (position_taps(y, rows)?, position_taps(x, cols)?);

    row_taps
        .iter()
        .flat_map(|r| {
            col_taps
                .iter()
                .map(move |c| (r.index, c.index, r.weight * c.weight))
        })
        .filter(|&(_, _, weight)| weight > WEIGHT_EPSILON)
        .try_fold(T::zero(), |acc, (r, c, weight)| {
            let value = grid.get((r, c)).copied().flatten()?;
            Some(value.mul_add(T::from(weight)?, acc))
        })
}

// Neighbouring indices and weights for one axis; None when outside [0, len - 1]
fn position_taps(position: f64, len: usize) -> Option<Vec<Tap>> {
    let max_index = len.checked_sub(1)? as f64;
    if position < -BOUNDS_EPSILON || position > max_index + BOUNDS_EPSILON {
        return None;
    }

    let snapped = if (position - position.round()).abs() < BOUNDS_EPSILON {
        position.round()
    } else {
        position
    };
    let clamped = snapped.clamp(0.0, max_index);
    let lower = clamped.floor();
    let frac = clamped - lower;
    let lower = lower as usize;

    if frac == 0.0 {
        return Some(vec![Tap {
            index: lower,
            weight: 1.0,
        }]);
    }
    Some(vec![
        Tap {
            index: lower,
            weight: 1.0 - frac,
        },
        Tap {
            index: lower + 1,
            weight: frac,
        },
    ])
}
