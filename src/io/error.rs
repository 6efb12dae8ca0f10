//! Error types and path context for alignment operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all alignment operations
#[derive(Debug)]
pub enum AlignError {
    /// Source filename does not carry a usable resolution suffix
    MalformedFilename {
        /// Path of the offending file
        path: PathBuf,
        /// Which naming constraint was violated
        reason: String,
    },

    /// Source has no entry in the offset mapping
    UnknownOffset {
        /// Path of the offending file
        path: PathBuf,
        /// Base filename used as the lookup key
        key: String,
    },

    /// A scaled and offset source covers no canvas cells
    DegenerateFootprint {
        /// Name of the source
        name: String,
        /// Placed height in canvas cells
        height: i64,
        /// Placed width in canvas cells
        width: i64,
    },

    /// File could not be decoded as an image
    UnsupportedFormat {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// Batch contains no sources
    NoSources {
        /// Directory that was scanned
        path: PathBuf,
    },

    /// Offset mapping could not be read or validated
    InvalidOffsets {
        /// Path of the mapping file
        path: PathBuf,
        /// Description of what's wrong with the mapping
        reason: String,
    },

    /// A table line could not be parsed
    TableParse {
        /// Path of the table
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// Description of the parse failure
        reason: String,
    },

    /// Table parsed but cannot form a grid
    InvalidTable {
        /// Path of the table
        path: PathBuf,
        /// Description of what's wrong with the table
        reason: String,
    },

    /// Placement slice disagrees with the resampled source size
    ///
    /// Only raised by the legacy column placement, whose start and end
    /// columns use different axis shifts.
    PlacementMismatch {
        /// Name of the source
        name: String,
        /// Width of the resampled source
        expected: usize,
        /// Width of the canvas slice it was assigned to
        actual: usize,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedFilename { path, reason } => {
                write!(f, "Malformed filename '{}': {reason}", path.display())
            }
            Self::UnknownOffset { path, key } => {
                write!(
                    f,
                    "No offset entry '{key}' for source '{}'",
                    path.display()
                )
            }
            Self::DegenerateFootprint {
                name,
                height,
                width,
            } => {
                write!(
                    f,
                    "Source '{name}' has a degenerate footprint ({height}x{width}); placed height and width must be positive"
                )
            }
            Self::UnsupportedFormat { path, source } => {
                write!(f, "Failed to decode '{}': {source}", path.display())
            }
            Self::NoSources { path } => {
                write!(f, "No source files found in '{}'", path.display())
            }
            Self::InvalidOffsets { path, reason } => {
                write!(f, "Invalid offset mapping '{}': {reason}", path.display())
            }
            Self::TableParse { path, line, reason } => {
                write!(
                    f,
                    "Failed to parse table '{}' at line {line}: {reason}",
                    path.display()
                )
            }
            Self::InvalidTable { path, reason } => {
                write!(f, "Invalid table '{}': {reason}", path.display())
            }
            Self::PlacementMismatch {
                name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Source '{name}' resampled to width {expected} but its canvas slice is {actual} wide"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for AlignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnsupportedFormat { source, .. } | Self::ImageExport { source, .. } => {
                Some(source)
            }
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for alignment results
pub type Result<T> = std::result::Result<T, AlignError>;

/// Attaches the path and operation to I/O failures
pub trait WithPath<T> {
    /// Convert an I/O error into [`AlignError::FileSystem`]
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation attached
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| AlignError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

/// Create a malformed filename error
pub fn malformed_filename(path: &Path, reason: &impl ToString) -> AlignError {
    AlignError::MalformedFilename {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Create a table parse error
pub fn table_parse(path: &Path, line: usize, reason: &impl ToString) -> AlignError {
    AlignError::TableParse {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    }
}
