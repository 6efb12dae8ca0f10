//! Canvas construction from loaded sources
//!
//! Every source is scaled to the finest resolution in the batch, resampled to its
//! footprint and written into its own channel of a shared canvas. The canvas is
//! the union bounding box of all footprints, shifted so every footprint lies at
//! non-negative coordinates.

use ndarray::{Array3, Axis, Slice};
use tracing::{debug, info};

use crate::io::configuration::{ColumnShift, ComposeOptions, MAX_INTENSITY};
use crate::io::error::{AlignError, Result};
use crate::io::offsets::Offset;
use crate::math::resample::resize;
use crate::spatial::footprint::{BoundingBox, Layout, SourceGeometry};
use crate::spatial::grid::{Grid, SampleKind, defined_count};

/// One loaded source ready for compositing
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// Base filename without extension
    pub name: String,
    /// Samples, already rotated if the offset carries an angle
    pub grid: Grid<f32>,
    /// Physical units per grid cell
    pub resolution: f64,
    /// Placement relative to the common reference frame
    pub offset: Offset,
    /// Measurement kind
    pub kind: SampleKind,
}

impl SourceRecord {
    /// Geometry used for canvas planning
    pub fn geometry(&self) -> SourceGeometry {
        let (rows, cols) = self.grid.dim();
        SourceGeometry {
            rows,
            cols,
            resolution: self.resolution,
            offset: self.offset.position(),
        }
    }
}

/// Multi-channel merge of all sources, indexed `[row, col, channel]`
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    data: Array3<Option<f32>>,
    kind: SampleKind,
    names: Vec<String>,
}

impl Canvas {
    /// Dimensions as `(height, width, channels)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Canvas height in cells
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Canvas width in cells
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Number of channels, one per source
    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    /// Measurement kind of the merged samples
    pub const fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Source names in channel order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sample at one cell and channel, `None` if undefined or out of range
    pub fn sample(&self, row: usize, col: usize, channel: usize) -> Option<f32> {
        self.data.get((row, col, channel)).copied().flatten()
    }

    /// All channel samples at one cell
    pub fn samples_at(&self, row: usize, col: usize) -> Vec<Option<f32>> {
        (0..self.channels())
            .map(|channel| self.sample(row, col, channel))
            .collect()
    }

    /// Copy of one channel as a grid
    pub fn channel(&self, channel: usize) -> Option<Grid<f32>> {
        (channel < self.channels()).then(|| self.data.index_axis(Axis(2), channel).to_owned())
    }

    /// Raw canvas samples
    pub const fn data(&self) -> &Array3<Option<f32>> {
        &self.data
    }
}

/// Merges a batch of sources onto one canvas
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    options: ComposeOptions,
}

impl Compositor {
    /// Create a compositor with the given options
    pub const fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    /// Plan the layout for a batch and reject degenerate footprints
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::DegenerateFootprint`] if a source covers no cells
    pub fn plan(&self, sources: &[SourceRecord]) -> Result<Option<Layout>> {
        let geometries: Vec<SourceGeometry> =
            sources.iter().map(SourceRecord::geometry).collect();
        let Some(layout) = Layout::plan(&geometries) else {
            return Ok(None);
        };

        for (source, footprint) in sources.iter().zip(&layout.footprints) {
            if footprint.is_degenerate() {
                return Err(AlignError::DegenerateFootprint {
                    name: source.name.clone(),
                    height: footprint.height(),
                    width: footprint.width(),
                });
            }
        }

        Ok(Some(layout))
    }

    /// Merge sources into a canvas, one channel per source in input order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The batch is empty
    /// - A source footprint has non-positive height or width
    /// - Legacy column placement produces a slice that does not fit the source
    pub fn compose(&self, sources: &[SourceRecord]) -> Result<Canvas> {
        self.compose_with(sources, |_, _| {})
    }

    /// Merge sources, reporting each placed channel to `on_placed`
    ///
    /// # Errors
    ///
    /// Same as [`Compositor::compose`]
    pub fn compose_with<F>(&self, sources: &[SourceRecord], mut on_placed: F) -> Result<Canvas>
    where
        F: FnMut(usize, &SourceRecord),
    {
        let layout = self
            .plan(sources)?
            .ok_or_else(|| AlignError::NoSources {
                path: "<batch>".into(),
            })?;

        let (height, width) = (layout.height(), layout.width());
        let kind = SampleKind::merged(sources.iter().map(|source| source.kind));
        info!(
            height,
            width,
            channels = sources.len(),
            shift_y = layout.shift[0],
            shift_x = layout.shift[1],
            "Composing canvas"
        );

        let mut data = Array3::from_elem((height, width, sources.len()), None);

        for (channel, (source, footprint)) in sources.iter().zip(&layout.footprints).enumerate() {
            let (rows, cols) = (footprint.height() as usize, footprint.width() as usize);
            let resized = resize(&source.grid, rows, cols);
            let (row_range, col_range) = self.placement(source, footprint, layout.shift)?;

            debug!(
                source = %source.name,
                scale = layout.scales.get(channel).copied().unwrap_or(1.0),
                rows,
                cols,
                row_start = row_range.0,
                col_start = col_range.0,
                "Placing source"
            );

            let mut target = data.index_axis_mut(Axis(2), channel);
            target.slice_axis_inplace(Axis(0), Slice::from(row_range.0..row_range.1));
            target.slice_axis_inplace(Axis(1), Slice::from(col_range.0..col_range.1));
            target.zip_mut_with(&resized, |cell, &sample| {
                *cell = sample.map(|value| quantize(value, kind));
            });

            debug!(
                source = %source.name,
                defined = defined_count(&resized),
                "Placed source"
            );
            on_placed(channel, source);
        }

        Ok(Canvas {
            data,
            kind,
            names: sources.iter().map(|source| source.name.clone()).collect(),
        })
    }

    // Canvas row and column ranges for one footprint
    fn placement(
        &self,
        source: &SourceRecord,
        footprint: &BoundingBox,
        shift: [i64; 2],
    ) -> Result<((usize, usize), (usize, usize))> {
        let rows = (
            (footprint.min[0] + shift[0]) as usize,
            (footprint.max[0] + shift[0]) as usize,
        );
        let col_start_shift = match self.options.column_shift {
            ColumnShift::Corrected => shift[1],
            ColumnShift::Legacy => shift[0],
        };
        let col_start = footprint.min[1] + col_start_shift;
        let col_end = footprint.max[1] + shift[1];

        // A start left of the canvas leaves no columns to fill
        let expected = footprint.width() as usize;
        let actual = if col_start < 0 {
            0
        } else {
            (col_end - col_start).max(0) as usize
        };
        if actual != expected {
            return Err(AlignError::PlacementMismatch {
                name: source.name.clone(),
                expected,
                actual,
            });
        }

        Ok((rows, (col_start as usize, col_end as usize)))
    }
}

// Intensity canvases hold whole 8-bit values
fn quantize(value: f32, kind: SampleKind) -> f32 {
    match kind {
        SampleKind::Intensity => value.round().clamp(0.0, MAX_INTENSITY),
        SampleKind::Height => value,
    }
}
