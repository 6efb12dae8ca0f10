//! Source discovery and decoding
//!
//! Every regular file in the source directory is one source. Its base filename
//! ends in `_<resolution>` and doubles as the key into the offset mapping.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::debug;

use crate::algorithm::compositor::SourceRecord;
use crate::io::configuration::{
    LUMA_SHIFT, LUMA_WEIGHTS, LoadOptions, MICROMETERS_PER_MILLIMETER, RESOLUTION_SEPARATOR,
    TABLE_EXTENSION, TableLayout,
};
use crate::io::error::{AlignError, Result, WithPath, malformed_filename};
use crate::io::offsets::OffsetTable;
use crate::io::table::{read_dense, read_points};
use crate::math::rotation::rotate;
use crate::spatial::densify::densify;
use crate::spatial::grid::{Grid, SampleKind, defined};

/// Base filename of a source, without its extension
///
/// # Errors
///
/// Returns [`AlignError::MalformedFilename`] if the path has no UTF-8 file stem
pub fn source_name(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| malformed_filename(path, &"file name is not valid UTF-8"))
}

/// Resolution encoded after the last separator of a base filename
///
/// # Errors
///
/// Returns [`AlignError::MalformedFilename`] if there is no separator or the
/// suffix is not a finite positive number
pub fn parse_resolution(path: &Path) -> Result<f64> {
    let name = source_name(path)?;
    let (_, suffix) = name.rsplit_once(RESOLUTION_SEPARATOR).ok_or_else(|| {
        malformed_filename(
            path,
            &format!("expected '<name>{RESOLUTION_SEPARATOR}<resolution>' but found no '{RESOLUTION_SEPARATOR}'"),
        )
    })?;

    let resolution: f64 = suffix.parse().map_err(|e| {
        malformed_filename(path, &format!("resolution '{suffix}' is not a number ({e})"))
    })?;

    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(malformed_filename(
            path,
            &format!("resolution '{suffix}' must be a finite positive number"),
        ));
    }
    Ok(resolution)
}

fn is_table(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(TABLE_EXTENSION)
}

fn decode_table(path: &Path, resolution: f64, options: LoadOptions) -> Result<Grid<f32>> {
    match options.table_layout {
        TableLayout::Dense => read_dense(path),
        TableLayout::Triples => {
            let points = read_points(path)?;
            let scale = MICROMETERS_PER_MILLIMETER / resolution;
            let densified = densify(&points, scale, options.shape_policy).ok_or_else(|| {
                AlignError::InvalidTable {
                    path: path.to_path_buf(),
                    reason: "table has no points with finite coordinates".to_string(),
                }
            })?;
            Ok(densified.grid)
        }
    }
}

fn decode_image(path: &Path) -> Result<(Grid<f32>, SampleKind)> {
    let image = image::open(path).map_err(|e| AlignError::UnsupportedFormat {
        path: path.to_path_buf(),
        source: e,
    })?;

    match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            let luma = image.to_luma32f();
            let grid = Grid::from_shape_fn(
                (luma.height() as usize, luma.width() as usize),
                |(row, col)| defined(luma.get_pixel(col as u32, row as u32).0[0]),
            );
            Ok((grid, SampleKind::Height))
        }
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => {
            let luma = image.to_luma8();
            let grid = Grid::from_shape_fn(
                (luma.height() as usize, luma.width() as usize),
                |(row, col)| Some(f32::from(luma.get_pixel(col as u32, row as u32).0[0])),
            );
            Ok((grid, SampleKind::Intensity))
        }
        _ => {
            let rgb = image.to_rgb8();
            let grid = Grid::from_shape_fn(
                (rgb.height() as usize, rgb.width() as usize),
                |(row, col)| {
                    Some(f32::from(rec601_luma(
                        rgb.get_pixel(col as u32, row as u32).0,
                    )))
                },
            );
            Ok((grid, SampleKind::Intensity))
        }
    }
}

/// Gray level of an 8-bit colour pixel, rounded to nearest
pub fn rec601_luma([red, green, blue]: [u8; 3]) -> u8 {
    let [wr, wg, wb] = LUMA_WEIGHTS;
    let weighted = u32::from(red) * wr + u32::from(green) * wg + u32::from(blue) * wb;
    let gray = (weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
    u8::try_from(gray).unwrap_or(u8::MAX)
}

/// Load one source file
///
/// # Errors
///
/// Returns an error if:
/// - The filename has no valid resolution suffix
/// - The offset mapping has no entry for the base filename
/// - The content cannot be decoded or yields an empty grid
pub fn load_source(path: &Path, offsets: &OffsetTable, options: LoadOptions) -> Result<SourceRecord> {
    let name = source_name(path)?;
    let resolution = parse_resolution(path)?;
    let offset = *offsets.get(name).ok_or_else(|| AlignError::UnknownOffset {
        path: path.to_path_buf(),
        key: name.to_string(),
    })?;

    let (grid, kind) = if is_table(path) {
        (decode_table(path, resolution, options)?, SampleKind::Height)
    } else {
        decode_image(path)?
    };

    if grid.is_empty() {
        return Err(AlignError::InvalidTable {
            path: path.to_path_buf(),
            reason: "source has no samples".to_string(),
        });
    }

    let grid = match offset.angle_degrees {
        Some(angle) => rotate(&grid, angle),
        None => grid,
    };

    debug!(
        source = name,
        rows = grid.nrows(),
        cols = grid.ncols(),
        resolution,
        offset_y = offset.y,
        offset_x = offset.x,
        angle = offset.angle_degrees.unwrap_or(0.0),
        "Loaded source"
    );

    Ok(SourceRecord {
        name: name.to_string(),
        grid,
        resolution,
        offset,
        kind,
    })
}

/// Regular files in a directory, in sorted order
///
/// # Errors
///
/// Returns an error if the directory cannot be read or contains no files
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_path(dir, "read directory")? {
        let path = entry.with_path(dir, "read directory entry")?.path();
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(AlignError::NoSources {
            path: dir.to_path_buf(),
        });
    }
    files.sort();
    Ok(files)
}

/// Load every source in a directory
///
/// # Errors
///
/// Returns the first error encountered; there is no partial result
pub fn load_directory(
    dir: &Path,
    offsets: &OffsetTable,
    options: LoadOptions,
) -> Result<Vec<SourceRecord>> {
    source_files(dir)?
        .iter()
        .map(|path| load_source(path, offsets, options))
        .collect()
}
