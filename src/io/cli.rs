//! Command-line interface for aligning a directory of sources into one table

use crate::algorithm::compositor::{Canvas, Compositor, SourceRecord};
use crate::io::configuration::{
    ColumnShift, ComposeOptions, DEFAULT_OFFSETS_FILE, DEFAULT_PREVIEW_FILE, LoadOptions,
    ShapePolicy, TableLayout,
};
use crate::io::error::Result;
use crate::io::loader::{load_source, source_files};
use crate::io::offsets::OffsetTable;
use crate::io::preview::export_preview;
use crate::io::progress::ProgressManager;
use crate::io::table::write_table;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "surfalign")]
#[command(
    author,
    version,
    about = "Align multi-resolution images and height tables into one coordinate table"
)]
/// Command-line arguments for the alignment tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Folder with images or CSV tables
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: PathBuf,

    /// Write a blended preview of all channels
    #[arg(short = 'd', long)]
    pub show_debug: bool,

    /// Path of the blended preview image
    #[arg(long, default_value = DEFAULT_PREVIEW_FILE)]
    pub preview: PathBuf,

    /// Don't center axes in the exported table
    #[arg(short = 'n', long)]
    pub no_center: bool,

    /// Output table path
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// JSON file mapping base filenames to [y, x] or [y, x, degrees]
    #[arg(short = 'f', long, default_value = DEFAULT_OFFSETS_FILE)]
    pub offsets: PathBuf,

    /// Layout of CSV sources
    #[arg(long, value_enum, default_value_t = TableLayout::default())]
    pub table_layout: TableLayout,

    /// Grid sizing for coordinate triples
    #[arg(long, value_enum, default_value_t = ShapePolicy::default())]
    pub shape_policy: ShapePolicy,

    /// Start columns at the row shift, as older releases did
    #[arg(long)]
    pub legacy_column_shift: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if exported coordinates should be centred
    pub const fn center_axes(&self) -> bool {
        !self.no_center
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Options for loading sources
    pub const fn load_options(&self) -> LoadOptions {
        LoadOptions {
            table_layout: self.table_layout,
            shape_policy: self.shape_policy,
        }
    }

    /// Options for compositing
    pub const fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            column_shift: if self.legacy_column_shift {
                ColumnShift::Legacy
            } else {
                ColumnShift::Corrected
            },
        }
    }
}

/// Runs the load, compose and export stages for one invocation
pub struct Pipeline {
    cli: Cli,
    progress: ProgressManager,
}

impl Pipeline {
    /// Create a pipeline for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress = if cli.should_show_progress() {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };
        Self { cli, progress }
    }

    /// Load, merge and export according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns the first failure from any stage; nothing is written after a failure
    pub fn process(&self) -> Result<Canvas> {
        let start_time = Instant::now();
        let offsets = OffsetTable::from_json_file(&self.cli.offsets)?;
        info!(
            entries = offsets.len(),
            path = %self.cli.offsets.display(),
            "Loaded offset mapping"
        );

        let sources = self.load_sources(&offsets)?;
        let canvas = self.compose(&sources)?;

        if let Some(out) = &self.cli.out {
            write_table(&canvas, out, self.cli.center_axes())?;
            info!(path = %out.display(), "Wrote table");
        }

        if self.cli.show_debug {
            export_preview(&canvas, &self.cli.preview)?;
        }

        info!(elapsed_ms = start_time.elapsed().as_millis(), "Done");
        Ok(canvas)
    }

    fn load_sources(&self, offsets: &OffsetTable) -> Result<Vec<SourceRecord>> {
        let files = source_files(&self.cli.source_dir)?;
        self.progress.start_stage("Loading", files.len());

        let mut sources = Vec::with_capacity(files.len());
        for path in &files {
            let source = load_source(path, offsets, self.cli.load_options())?;
            self.progress.advance(&source.name);
            sources.push(source);
        }
        Ok(sources)
    }

    fn compose(&self, sources: &[SourceRecord]) -> Result<Canvas> {
        self.progress.start_stage("Placing", sources.len());
        let compositor = Compositor::new(self.cli.compose_options());
        let canvas = compositor.compose_with(sources, |_, source| {
            self.progress.advance(&source.name);
        })?;
        self.progress.finish();
        Ok(canvas)
    }
}
