//! Comma-separated table input and canvas export
//!
//! Input tables are either coordinate triples (`x, y, value` per line) or a dense
//! row-major grid. Empty fields and `nan` are undefined samples. The exporter
//! writes one line per canvas cell with a `x,y,z_m1..z_mN` header.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use ndarray::Array2;
use num_traits::Float;

use crate::algorithm::compositor::Canvas;
use crate::io::configuration::{CHANNEL_COLUMN_PREFIX, TABLE_DELIMITER, UNDEFINED_TEXT};
use crate::io::error::{AlignError, Result, WithPath, table_parse};
use crate::spatial::densify::SamplePoint;
use crate::spatial::grid::{Grid, SampleKind, defined};

/// One exported canvas cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecord {
    /// Column coordinate, possibly centred
    pub x: i64,
    /// Row coordinate, possibly centred
    pub y: i64,
    /// One sample per channel
    pub values: Vec<Option<f32>>,
}

/// Exported table read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTable {
    /// Channel column names in order
    pub channels: Vec<String>,
    /// Records in file order
    pub records: Vec<TableRecord>,
}

fn parse_field<T>(field: &str) -> std::result::Result<Option<T>, String>
where
    T: Float + FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: T = trimmed
        .parse()
        .map_err(|e| format!("'{trimmed}' is not a number ({e})"))?;
    Ok(defined(value))
}

// Parsed numeric lines with their one-based line numbers; blank lines are skipped
fn read_numeric_lines(path: &Path) -> Result<Vec<(usize, Vec<Option<f64>>)>> {
    let text = std::fs::read_to_string(path).with_path(path, "read table")?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split(TABLE_DELIMITER)
                .map(parse_field::<f64>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(|fields| (index + 1, fields))
                .map_err(|reason| table_parse(path, index + 1, &reason))
        })
        .collect()
}

/// Read `x, y, value` triples
///
/// # Errors
///
/// Returns an error if the file cannot be read, a field is not numeric, a line
/// has fewer than three fields or a coordinate is undefined
pub fn read_points(path: &Path) -> Result<Vec<SamplePoint>> {
    read_numeric_lines(path)?
        .into_iter()
        .map(|(line, fields)| match fields.as_slice() {
            &[Some(x), Some(y), value, ..] => Ok(SamplePoint::new(
                x,
                y,
                value.map_or(f32::NAN, |v| v as f32),
            )),
            &[_, _, _, ..] => Err(table_parse(path, line, &"coordinates must be defined")),
            short => Err(table_parse(
                path,
                line,
                &format!("expected x, y, value but found {} fields", short.len()),
            )),
        })
        .collect()
}

/// Read a dense row-major grid
///
/// # Errors
///
/// Returns an error if the file cannot be read, a field is not numeric, rows
/// differ in length or the table is empty
pub fn read_dense(path: &Path) -> Result<Grid<f32>> {
    let lines = read_numeric_lines(path)?;
    let cols = lines
        .first()
        .map(|(_, fields)| fields.len())
        .ok_or_else(|| AlignError::InvalidTable {
            path: path.to_path_buf(),
            reason: "table has no rows".to_string(),
        })?;

    let mut values = Vec::with_capacity(lines.len() * cols);
    for (line, fields) in &lines {
        if fields.len() != cols {
            return Err(table_parse(
                path,
                *line,
                &format!("expected {cols} fields but found {}", fields.len()),
            ));
        }
        values.extend(fields.iter().map(|field| field.map(|v| v as f32)));
    }

    Array2::from_shape_vec((lines.len(), cols), values).map_err(|e| AlignError::InvalidTable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Flatten a canvas row-major, optionally centring the axes
///
/// Centring subtracts `floor(width / 2)` from x and `floor(height / 2)` from y.
pub fn flatten(canvas: &Canvas, center: bool) -> Vec<TableRecord> {
    let (height, width, _) = canvas.dim();
    let (dy, dx) = if center {
        ((height / 2) as i64, (width / 2) as i64)
    } else {
        (0, 0)
    };

    let mut records = Vec::with_capacity(height * width);
    for y in 0..height {
        for x in 0..width {
            records.push(TableRecord {
                x: x as i64 - dx,
                y: y as i64 - dy,
                values: canvas.samples_at(y, x),
            });
        }
    }
    records
}

/// Column names of an exported table
pub fn header(channels: usize) -> Vec<String> {
    ["x".to_string(), "y".to_string()]
        .into_iter()
        .chain((1..=channels).map(|i| format!("{CHANNEL_COLUMN_PREFIX}{i}")))
        .collect()
}

fn format_sample(sample: Option<f32>, kind: SampleKind) -> String {
    match (sample, kind) {
        (Some(value), SampleKind::Intensity) => (value.round() as i64).to_string(),
        (None, SampleKind::Intensity) => "0".to_string(),
        (Some(value), SampleKind::Height) => value.to_string(),
        (None, SampleKind::Height) => UNDEFINED_TEXT.to_string(),
    }
}

/// Write the canvas as a coordinate table
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written
pub fn write_table(canvas: &Canvas, path: &Path, center: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
    }

    let file = File::create(path).with_path(path, "create table")?;
    let mut writer = BufWriter::new(file);
    let delimiter = TABLE_DELIMITER.to_string();

    writeln!(writer, "{}", header(canvas.channels()).join(&delimiter))
        .with_path(path, "write table")?;

    for record in flatten(canvas, center) {
        let mut fields = vec![record.x.to_string(), record.y.to_string()];
        fields.extend(
            record
                .values
                .iter()
                .map(|&sample| format_sample(sample, canvas.kind())),
        );
        writeln!(writer, "{}", fields.join(&delimiter)).with_path(path, "write table")?;
    }

    writer.flush().with_path(path, "write table")
}

/// Read a table previously written by [`write_table`]
///
/// # Errors
///
/// Returns an error if the file cannot be read, the header is missing or a
/// record is malformed
pub fn read_export(path: &Path) -> Result<ExportedTable> {
    let text = std::fs::read_to_string(path).with_path(path, "read table")?;
    let mut lines = text.lines().enumerate();

    let channels: Vec<String> = lines
        .next()
        .map(|(_, line)| {
            line.split(TABLE_DELIMITER)
                .skip(2)
                .map(str::to_string)
                .collect()
        })
        .ok_or_else(|| table_parse(path, 1, &"missing header"))?;

    let mut records = Vec::new();
    for (index, line) in lines.filter(|(_, line)| !line.trim().is_empty()) {
        let fields: Vec<&str> = line.split(TABLE_DELIMITER).collect();
        let record = match fields.split_first_chunk::<2>() {
            Some((&[x, y], values)) if values.len() == channels.len() => {
                parse_record(x, y, values)
            }
            _ => Err(format!(
                "expected x, y and {} channel values",
                channels.len()
            )),
        };
        records.push(record.map_err(|reason| table_parse(path, index + 1, &reason))?);
    }

    Ok(ExportedTable { channels, records })
}

fn parse_record(x: &str, y: &str, values: &[&str]) -> std::result::Result<TableRecord, String> {
    let coordinate = |field: &str| {
        parse_field::<f64>(field)?
            .map(|value| value as i64)
            .ok_or_else(|| "coordinates must be defined".to_string())
    };
    Ok(TableRecord {
        x: coordinate(x)?,
        y: coordinate(y)?,
        values: values
            .iter()
            .map(|field| parse_field::<f32>(field))
            .collect::<std::result::Result<_, _>>()?,
    })
}
