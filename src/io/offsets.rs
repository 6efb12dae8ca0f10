//! Per-source placement offsets supplied at invocation time
//!
//! The mapping is read from a JSON object keyed by base filename (no extension).
//! Each value is `[y, x]` or `[y, x, angle_degrees]` in pixels of the unscaled
//! source:
//!
//! ```json
//! { "scan_0.8": [0, 0], "scan_1": [20, 50], "scan_8": [-30, -30, 12.5] }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::io::error::{AlignError, Result, WithPath};

/// Placement of one source relative to the common reference frame
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct Offset {
    /// Vertical offset in unscaled source pixels
    pub y: f64,
    /// Horizontal offset in unscaled source pixels
    pub x: f64,
    /// Rotation about the source centre in degrees
    pub angle_degrees: Option<f64>,
}

impl Offset {
    /// Offset without rotation
    pub const fn new(y: f64, x: f64) -> Self {
        Self {
            y,
            x,
            angle_degrees: None,
        }
    }

    /// Offset with a rotation about the source centre
    pub const fn rotated(y: f64, x: f64, angle_degrees: f64) -> Self {
        Self {
            y,
            x,
            angle_degrees: Some(angle_degrees),
        }
    }

    /// Positional part as `[y, x]`
    pub const fn position(&self) -> [f64; 2] {
        [self.y, self.x]
    }
}

impl TryFrom<Vec<f64>> for Offset {
    type Error = String;

    fn try_from(components: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        if components.iter().any(|value| !value.is_finite()) {
            return Err(format!("offset components must be finite, got {components:?}"));
        }
        match components.as_slice() {
            &[y, x] => Ok(Self::new(y, x)),
            &[y, x, angle] => Ok(Self::rotated(y, x, angle)),
            other => Err(format!(
                "offset needs 2 or 3 components (y, x[, degrees]), got {}",
                other.len()
            )),
        }
    }
}

/// Offsets keyed by base filename
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OffsetTable {
    entries: HashMap<String, Offset>,
}

impl OffsetTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON text
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::InvalidOffsets`] if the text is not a JSON object of
    /// 2- or 3-component numeric arrays
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AlignError::InvalidOffsets {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Read a table from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its content is invalid
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_path(path, "read offsets")?;
        Self::from_json_str(&text, path)
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, offset: Offset) {
        self.entries.insert(key.into(), offset);
    }

    /// Look up the offset for a base filename
    pub fn get(&self, key: &str) -> Option<&Offset> {
        self.entries.get(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Offset)> for OffsetTable {
    fn from_iter<I: IntoIterator<Item = (K, Offset)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
