// src/extractors/tidy.rs

// --- Imports ---
use crate::extractors::layout::LayoutConfig;
use crate::extractors::locate::find_anchor;
use crate::extractors::record::{Section, SkippedCell};
use crate::utils::error::ExtractError;
use crate::workbook::{load_sheet, Coord, Grid};
use std::path::Path;

/// Shared handle for both section extractors.
///
/// Each `extract_*` call re-reads the sheet from disk; nothing is cached
/// between calls. The `*_from_grid` variants do the layout work on an
/// already loaded grid.
#[derive(Debug, Clone, Default)]
pub struct TidyExtractor {
    layout: LayoutConfig,
    strict: bool,
}

impl TidyExtractor {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            strict: false,
        }
    }

    /// In strict mode any skipped cell fails the extraction instead of being dropped.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub(crate) fn load(&self, xlsx_path: &Path) -> Result<Grid, ExtractError> {
        Ok(load_sheet(xlsx_path, &self.layout.sheet)?)
    }

    /// Anchor for a required section, or `MissingSection`.
    pub(crate) fn locate(&self, grid: &Grid, anchor_text: &str) -> Result<Coord, ExtractError> {
        find_anchor(grid, anchor_text).ok_or_else(|| ExtractError::MissingSection {
            anchor: anchor_text.to_string(),
            sheet: self.layout.sheet.clone(),
        })
    }

    /// Applies the strict/lenient policy to the cells a section dropped.
    pub(crate) fn enforce(&self, section: Section, skipped: &[SkippedCell]) -> Result<(), ExtractError> {
        if skipped.is_empty() {
            return Ok(());
        }
        if self.strict {
            let first = &skipped[0];
            return Err(ExtractError::SchemaDrift {
                section: section.name().to_string(),
                row: first.at.row,
                col: first.at.col,
                reason: first.reason.to_string(),
            });
        }
        tracing::debug!("{}: skipped {} cells (lenient mode)", section, skipped.len());
        Ok(())
    }
}
