//! Footprint geometry for placing sources on a shared canvas
//!
//! All coordinates are in the frame of the finest-resolution source. A source with
//! coarser resolution is scaled up by `resolution / min(resolution)` and its offset
//! is scaled by the same factor before flooring to canvas cells.

/// Half-open axis-aligned box in canvas cells, `[min, max)` per axis as `[y, x]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Minimum coordinates (inclusive)
    pub min: [i64; 2],
    /// Maximum coordinates (exclusive)
    pub max: [i64; 2],
}

impl BoundingBox {
    /// Number of rows covered; non-positive for degenerate boxes
    pub const fn height(&self) -> i64 {
        self.max[0] - self.min[0]
    }

    /// Number of columns covered; non-positive for degenerate boxes
    pub const fn width(&self) -> i64 {
        self.max[1] - self.min[1]
    }

    /// Whether the box covers at least one cell
    pub const fn is_degenerate(&self) -> bool {
        self.height() <= 0 || self.width() <= 0
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }
}

/// Size, resolution and placement of one source before scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceGeometry {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Physical units per grid cell
    pub resolution: f64,
    /// Unscaled `[y, x]` offset in source pixels
    pub offset: [f64; 2],
}

/// Placement of every source on the shared canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Per-source scale relative to the finest resolution
    pub scales: Vec<f64>,
    /// Per-source `[y, x]` offset after scaling
    pub scaled_offsets: Vec<[f64; 2]>,
    /// Per-source footprint before the global shift
    pub footprints: Vec<BoundingBox>,
    /// Union of all footprints
    pub bounds: BoundingBox,
    /// `[y, x]` translation making every footprint non-negative
    pub shift: [i64; 2],
}

impl Layout {
    /// Compute scales, footprints and the canvas bounds for a batch
    ///
    /// Returns `None` for an empty batch.
    pub fn plan(sources: &[SourceGeometry]) -> Option<Self> {
        let finest = sources
            .iter()
            .map(|source| source.resolution)
            .reduce(f64::min)?;

        let scales: Vec<f64> = sources
            .iter()
            .map(|source| source.resolution / finest)
            .collect();

        let scaled_offsets: Vec<[f64; 2]> = sources
            .iter()
            .zip(&scales)
            .map(|(source, &scale)| [scale * source.offset[0], scale * source.offset[1]])
            .collect();

        let footprints: Vec<BoundingBox> = sources
            .iter()
            .zip(scales.iter().zip(&scaled_offsets))
            .map(|(source, (&scale, offset))| footprint(source, scale, *offset))
            .collect();

        let bounds = footprints.iter().skip(1).fold(*footprints.first()?, |acc, fp| acc.union(fp));

        let min_offset = |axis: usize| {
            scaled_offsets
                .iter()
                .map(|offset| offset[axis])
                .fold(f64::INFINITY, f64::min)
        };
        let shift = [
            -(min_offset(0).floor() as i64),
            -(min_offset(1).floor() as i64),
        ];

        Some(Self {
            scales,
            scaled_offsets,
            footprints,
            bounds,
            shift,
        })
    }

    /// Canvas height in cells
    pub fn height(&self) -> usize {
        self.bounds.height().max(0) as usize
    }

    /// Canvas width in cells
    pub fn width(&self) -> usize {
        self.bounds.width().max(0) as usize
    }
}

fn footprint(source: &SourceGeometry, scale: f64, offset: [f64; 2]) -> BoundingBox {
    BoundingBox {
        min: [offset[0].floor() as i64, offset[1].floor() as i64],
        max: [
            (source.rows as f64).mul_add(scale, offset[0]).floor() as i64,
            (source.cols as f64).mul_add(scale, offset[1]).floor() as i64,
        ],
    }
}
