//! Conversion of irregular coordinate listings into dense grids
//!
//! Coordinates are scaled to pixel units, shifted so the smallest coordinate lands
//! on index 0 and truncated. The grid shape depends on the [`ShapePolicy`]:
//! counting distinct coordinates assumes a regular, gapless lattice, while the
//! index span keeps gaps as undefined cells at the cost of a larger grid.

use std::collections::BTreeSet;

use ndarray::Array2;
use tracing::warn;

use crate::io::configuration::ShapePolicy;
use crate::spatial::grid::{Grid, defined};

// Absorbs representation error such as 0.003 * 1000 = 2.9999999999999996
const QUANTIZE_EPSILON: f64 = 1e-6;

/// One observed sample at physical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Horizontal coordinate (column axis)
    pub x: f64,
    /// Vertical coordinate (row axis)
    pub y: f64,
    /// Observed value; NaN is treated as undefined
    pub value: f32,
}

impl SamplePoint {
    /// Create a sample point
    pub const fn new(x: f64, y: f64, value: f32) -> Self {
        Self { x, y, value }
    }
}

/// Dense grid produced from sample points
#[derive(Debug, Clone)]
pub struct Densified {
    /// Grid indexed `[row, col]` with rows from y and columns from x
    pub grid: Grid<f32>,
    /// Points that could not be stored in the grid
    pub dropped: usize,
}

/// Scatter sample points into a dense grid
///
/// Returns `None` when no point has finite coordinates.
pub fn densify(points: &[SamplePoint], scale: f64, policy: ShapePolicy) -> Option<Densified> {
    let finite: Vec<(f64, f64, f32)> = points
        .iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .map(|p| (p.x * scale, p.y * scale, p.value))
        .collect();
    let mut dropped = points.len() - finite.len();

    let min_x = finite.iter().map(|p| p.0).reduce(f64::min)?;
    let min_y = finite.iter().map(|p| p.1).reduce(f64::min)?;

    let indexed: Vec<(usize, usize, f32)> = finite
        .iter()
        .map(|&(x, y, value)| (quantize(y - min_y), quantize(x - min_x), value))
        .collect();

    let (rows, cols) = match policy {
        ShapePolicy::DistinctValues => {
            let distinct_rows: BTreeSet<usize> = indexed.iter().map(|p| p.0).collect();
            let distinct_cols: BTreeSet<usize> = indexed.iter().map(|p| p.1).collect();
            (distinct_rows.len(), distinct_cols.len())
        }
        ShapePolicy::IndexSpan => {
            let max_row = indexed.iter().map(|p| p.0).max().unwrap_or(0);
            let max_col = indexed.iter().map(|p| p.1).max().unwrap_or(0);
            (max_row + 1, max_col + 1)
        }
    };

    let mut grid = Array2::from_elem((rows, cols), None);
    for &(row, col, value) in &indexed {
        match grid.get_mut((row, col)) {
            Some(cell) => *cell = defined(value),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, rows, cols, "Sample points fell outside the densified grid");
    }

    Some(Densified { grid, dropped })
}

fn quantize(offset: f64) -> usize {
    (offset + QUANTIZE_EPSILON).trunc().max(0.0) as usize
}
