// src/extractors/product_contribution.rs

// --- Imports ---
use crate::extractors::layout::{PeriodScope, ProductContributionLayout};
use crate::extractors::locate::{contains_ignore_case, find_last_period, product_code};
use crate::extractors::record::{PeriodLabel, Section, SectionExtraction, SkipReason, SkippedCell, TidyRecord};
use crate::extractors::tidy::TidyExtractor;
use crate::utils::error::ExtractError;
use crate::workbook::{Grid, Window};
use std::collections::BTreeMap;
use std::path::Path;

/// A window row whose label column names a known metric.
#[derive(Debug, Clone, PartialEq)]
struct MetricRow {
    row: usize,
    label: String,
}

impl TidyExtractor {
    /// Reads the configured sheet and extracts the Product Contribution block.
    pub fn extract_product_contribution<P: AsRef<Path>>(
        &self,
        xlsx_path: P,
    ) -> Result<SectionExtraction, ExtractError> {
        let grid = self.load(xlsx_path.as_ref())?;
        self.product_contribution_from_grid(&grid)
    }

    pub fn product_contribution_from_grid(&self, grid: &Grid) -> Result<SectionExtraction, ExtractError> {
        let section = Section::ProductContribution;
        let layout = &self.layout().product_contribution;
        let sheet = self.layout().sheet.clone();

        // 1. Anchor and window
        let anchor = self.locate(grid, &layout.anchor)?;
        let window = grid.window(anchor, layout.window_rows, layout.window_cols);
        tracing::debug!(
            "{}: anchor {}, window origin {} ({} x {})",
            section,
            anchor,
            window.origin(),
            window.height(),
            window.width()
        );

        // 2. Layout inference
        let metric_rows = detect_metric_rows(&window, layout);
        let unit = detect_unit(&window, &layout.unit_marker);
        let products = detect_product_columns(&window, layout.min_product_columns);
        let period = detect_period(grid, &window, layout.period_scope);
        tracing::debug!(
            "{}: {} metric rows, {} product columns, unit {:?}, period {:?}",
            section,
            metric_rows.len(),
            products.len(),
            unit,
            period
        );

        // 3. Emission
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        // One period tag for the whole block.
        let period_label = period.map(PeriodLabel::Period);

        if products.is_empty() && !metric_rows.is_empty() {
            tracing::warn!("{}: no product header row found, nothing to emit", section);
            skipped.push(SkippedCell {
                at: anchor,
                reason: SkipReason::NoProductHeader,
            });
        }

        for metric in &metric_rows {
            for (col, cell) in window.row(metric.row) {
                let at = window.absolute(metric.row, col);
                match (cell.as_number(), products.get(&col)) {
                    (Some(value), Some(product)) => records.push(TidyRecord {
                        section,
                        metric: metric.label.clone(),
                        product: Some(product.clone()),
                        period: period_label,
                        value,
                        unit: unit.clone(),
                        sheet: sheet.clone(),
                        row: at.row,
                        col: at.col,
                    }),
                    (Some(_), None) if !products.is_empty() => {
                        tracing::trace!("{}: number at {} has no product column", section, at);
                        skipped.push(SkippedCell { at, reason: SkipReason::UnmappedColumn });
                    }
                    (None, Some(_)) if !cell.is_blank() => {
                        tracing::trace!("{}: non-numeric value at {}: {}", section, at, cell);
                        skipped.push(SkippedCell { at, reason: SkipReason::NonNumeric });
                    }
                    _ => {}
                }
            }
        }

        self.enforce(section, &skipped)?;
        tracing::info!("{}: extracted {} records", section, records.len());

        Ok(SectionExtraction {
            section,
            sheet,
            anchor,
            window_origin: window.origin(),
            window_rows: window.height(),
            window_cols: window.width(),
            unit,
            period,
            records,
            skipped,
        })
    }
}

/// Rows 1.. of the window whose fixed label column matches a known metric.
/// Row 0 is the anchor's own row and is never a metric row.
fn detect_metric_rows(window: &Window<'_>, layout: &ProductContributionLayout) -> Vec<MetricRow> {
    (1..window.height())
        .filter_map(|row| {
            let label = window.get(row, layout.label_col).non_blank_text()?;
            layout
                .metrics
                .iter()
                .any(|known| contains_ignore_case(label, known))
                .then(|| MetricRow {
                    row,
                    label: label.to_string(),
                })
        })
        .collect()
}

/// The unit marker, if any window cell mentions it.
fn detect_unit(window: &Window<'_>, marker: &str) -> Option<String> {
    window
        .cells()
        .filter_map(|(_, cell)| cell.as_text())
        .any(|text| contains_ignore_case(text, marker))
        .then(|| marker.to_string())
}

/// Column -> product code, taken from the lowest window row holding at least
/// `min_columns` product tickers. Empty when no row qualifies.
fn detect_product_columns(window: &Window<'_>, min_columns: usize) -> BTreeMap<usize, String> {
    for row in (0..window.height()).rev() {
        let columns: BTreeMap<usize, String> = window
            .row(row)
            .filter_map(|(col, cell)| product_code(cell).map(|code| (col, code.to_string())))
            .collect();
        if columns.len() >= min_columns.max(1) {
            tracing::debug!("Product header row at window row {}: {:?}", row, columns);
            return columns;
        }
    }
    BTreeMap::new()
}

fn detect_period(grid: &Grid, window: &Window<'_>, scope: PeriodScope) -> Option<u64> {
    let sheet_period = || find_last_period(grid.cells().map(|(_, cell)| cell));
    match scope {
        PeriodScope::Sheet => sheet_period(),
        PeriodScope::Window => {
            find_last_period(window.cells().map(|(_, cell)| cell)).or_else(sheet_period)
        }
    }
}
