//! Pipeline constants and runtime configuration

use clap::ValueEnum;

// Source naming and decoding
/// Extension selecting the table decoder
pub const TABLE_EXTENSION: &str = "csv";
/// Separator between a source name and its resolution suffix
pub const RESOLUTION_SEPARATOR: char = '_';
/// Table field delimiter for both input and output
pub const TABLE_DELIMITER: char = ',';

// Table coordinates are millimetres while resolutions are micrometres per pixel
/// Micrometres per millimetre
pub const MICROMETERS_PER_MILLIMETER: f64 = 1000.0;

// Export format
/// Prefix of the per-channel value columns in exported tables
pub const CHANNEL_COLUMN_PREFIX: &str = "z_m";
/// Text written for undefined samples in height tables
pub const UNDEFINED_TEXT: &str = "NaN";

// Intensity sample range
/// Largest value an intensity sample may take
pub const MAX_INTENSITY: f32 = 255.0;

// Colour to gray conversion uses Rec.601 weights in 14-bit fixed point
/// Red, green and blue luma weights scaled by `1 << LUMA_SHIFT`
pub const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
/// Fixed-point precision of [`LUMA_WEIGHTS`]
pub const LUMA_SHIFT: u32 = 14;

// Resampling tolerances
/// Interpolation weights at or below this are treated as zero
pub const WEIGHT_EPSILON: f64 = 1e-9;
/// Slack allowed when deciding whether a rotated position is inside the grid
pub const BOUNDS_EPSILON: f64 = 1e-6;

// Default file locations
/// Default offset mapping file
pub const DEFAULT_OFFSETS_FILE: &str = "offsets.json";
/// Default debug preview image
pub const DEFAULT_PREVIEW_FILE: &str = "overlay.png";

// Logging
/// Environment variable consulted for the log filter before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "SURFALIGN_LOG";
/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when progress output is suppressed
pub const QUIET_LOG_LEVEL: &str = "warn";

/// Layout of numeric table sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TableLayout {
    /// Rows of `x, y, value` in millimetres
    #[default]
    Triples,
    /// Row-major dense grid of values
    Dense,
}

/// How the densifier sizes the grid built from coordinate triples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShapePolicy {
    /// Count distinct quantized coordinates; assumes a gapless lattice
    #[default]
    DistinctValues,
    /// Span from the smallest to the largest quantized index; gaps stay undefined
    IndexSpan,
}

/// Column origin used when placing sources on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnShift {
    /// Columns start at `x_min + shift_x`
    #[default]
    Corrected,
    /// Columns start at `x_min + shift_y` and end at `x_max + shift_x`
    Legacy,
}

/// Options consumed while loading sources
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Layout of `.csv` sources
    pub table_layout: TableLayout,
    /// Grid sizing for coordinate triples
    pub shape_policy: ShapePolicy,
}

/// Options consumed while compositing
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeOptions {
    /// Column placement rule
    pub column_shift: ColumnShift,
}
