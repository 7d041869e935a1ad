// src/extractors/company_pl.rs

// --- Imports ---
use crate::extractors::locate::{contains_ignore_case, period_label};
use crate::extractors::record::{PeriodLabel, Section, SectionExtraction, SkipReason, SkippedCell, TidyRecord};
use crate::extractors::tidy::TidyExtractor;
use crate::utils::error::ExtractError;
use crate::workbook::{Grid, Window};
use std::collections::BTreeMap;
use std::path::Path;

impl TidyExtractor {
    /// Reads the configured sheet and extracts the Company Profit & Loss Statement.
    pub fn extract_company_pl<P: AsRef<Path>>(&self, xlsx_path: P) -> Result<SectionExtraction, ExtractError> {
        let grid = self.load(xlsx_path.as_ref())?;
        self.company_pl_from_grid(&grid)
    }

    pub fn company_pl_from_grid(&self, grid: &Grid) -> Result<SectionExtraction, ExtractError> {
        let section = Section::CompanyProfitLoss;
        let layout = &self.layout().company_pl;
        let sheet = self.layout().sheet.clone();
        let unit = Some(layout.unit.clone());

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

        let (header_row, periods) = detect_period_header(&window, layout.min_period_columns)
            .ok_or_else(|| ExtractError::MissingHeader {
                section: section.name().to_string(),
                required: layout.min_period_columns,
            })?;
        tracing::debug!(
            "{}: header at window row {} with {} period columns",
            section,
            header_row,
            periods.len()
        );

        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for row in (header_row + 1)..window.height() {
            if is_terminator(&window, row, &layout.terminators) {
                tracing::debug!("{}: block ends at window row {}", section, row);
                break;
            }
            if window.row(row).all(|(_, cell)| cell.is_blank()) {
                continue;
            }

            let Some((label_col, label)) = window
                .row(row)
                .find_map(|(col, cell)| cell.non_blank_text().map(|text| (col, text.to_string())))
            else {
                // Numbers with nothing to name them.
                for (&col, _) in &periods {
                    if window.get(row, col).as_number().is_some() {
                        let at = window.absolute(row, col);
                        tracing::trace!("{}: unlabeled number at {}", section, at);
                        skipped.push(SkippedCell { at, reason: SkipReason::MissingLabel });
                    }
                }
                continue;
            };

            for (&col, &period) in &periods {
                let cell = window.get(row, col);
                let at = window.absolute(row, col);
                match cell.as_number() {
                    Some(value) => records.push(TidyRecord {
                        section,
                        metric: label.clone(),
                        product: None,
                        period: Some(period),
                        value,
                        unit: unit.clone(),
                        sheet: sheet.clone(),
                        row: at.row,
                        col: at.col,
                    }),
                    None if col != label_col && !cell.is_blank() => {
                        tracing::trace!("{}: non-numeric value at {}: {}", section, at, cell);
                        skipped.push(SkippedCell { at, reason: SkipReason::NonNumeric });
                    }
                    None => {}
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
            period: None,
            records,
            skipped,
        })
    }
}

/// First window row (top down) with at least `min_columns` period labels,
/// together with its column -> label mapping.
fn detect_period_header(
    window: &Window<'_>,
    min_columns: usize,
) -> Option<(usize, BTreeMap<usize, PeriodLabel>)> {
    (0..window.height()).find_map(|row| {
        let periods: BTreeMap<usize, PeriodLabel> = window
            .row(row)
            .filter_map(|(col, cell)| period_label(cell).map(|label| (col, label)))
            .collect();
        (periods.len() >= min_columns.max(1)).then_some((row, periods))
    })
}

/// Whether the row's joined text names one of the block terminators.
fn is_terminator(window: &Window<'_>, row: usize, terminators: &[String]) -> bool {
    let text = window
        .row(row)
        .filter_map(|(_, cell)| cell.as_text())
        .collect::<Vec<_>>()
        .join(" ");
    terminators.iter().any(|t| contains_ignore_case(&text, t))
}
