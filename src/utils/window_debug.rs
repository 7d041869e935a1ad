// src/utils/window_debug.rs
use crate::extractors::record::SectionExtraction;
use crate::utils::error::StorageError;
use crate::workbook::Grid;
use std::path::{Path, PathBuf};

/// Dumps the cells a section was inferred from as a raw CSV grid.
///
/// The first row holds absolute column numbers and the first column absolute
/// row numbers, so a suspicious cell can be found in the workbook directly.
pub fn save_window_csv(grid: &Grid, extraction: &SectionExtraction, debug_dir: &Path) -> Result<PathBuf, StorageError> {
    std::fs::create_dir_all(debug_dir)?;
    let path = debug_dir.join(format!("{}_window.csv", extraction.section.slug()));

    let origin = extraction.window_origin;
    let window = grid.region(origin, extraction.window_rows, extraction.window_cols);

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&path)?;

    let mut header = vec![String::new()];
    header.extend((0..window.width()).map(|c| (origin.col + c).to_string()));
    writer.write_record(&header)?;

    for r in 0..window.height() {
        let mut record = vec![(origin.row + r).to_string()];
        record.extend(window.row(r).map(|(_, cell)| cell.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    tracing::info!("Saved {} window dump to {}", extraction.section, path.display());
    Ok(path)
}
