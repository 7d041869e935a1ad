// src/workbook/loader.rs
use crate::utils::error::LoadError;
use crate::workbook::grid::{Cell, Grid};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads one sheet into a [`Grid`] with no header interpretation.
///
/// Cells land at their absolute sheet coordinates: calamine trims leading
/// empty rows and columns from a range, so those are padded back in here.
pub fn load_sheet<P: AsRef<Path>>(path: P, sheet: &str) -> Result<Grid, LoadError> {
    let path = path.as_ref();
    tracing::debug!("Opening workbook {} (sheet '{}')", path.display(), sheet);

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(LoadError::SheetMissing {
            path: path.display().to_string(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| LoadError::Sheet {
            sheet: sheet.to_string(),
            reason: e.to_string(),
        })?;

    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut cells = vec![Cell::Empty; start_col];
        cells.extend(data_row.iter().map(cell_from_data));
        rows.push(cells);
    }

    let grid = Grid::from_rows(rows);
    tracing::debug!(
        "Loaded sheet '{}': {} rows x {} cols",
        sheet,
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("export.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Firm").unwrap();
        sheet.write_string(2, 3, "Product Contribution").unwrap();
        sheet.write_number(4, 5, 100.0).unwrap();
        sheet.write_number(4, 6, 7).unwrap();
        sheet.write_boolean(5, 3, true).unwrap();
        workbook.add_worksheet().set_name("Other").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_sheet_keeps_absolute_coordinates() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);

        let grid = load_sheet(&path, "Firm").expect("Firm sheet should load");

        assert_eq!(grid.get(2, 3), &Cell::Text("Product Contribution".to_string()));
        assert_eq!(grid.get(4, 5).as_number(), Some(100.0));
        assert_eq!(grid.get(4, 6).as_number(), Some(7.0), "Integers should load as numbers");
        assert_eq!(grid.get(0, 0), &Cell::Empty, "Leading rows/cols should be padded");
        assert!(matches!(grid.get(5, 3), Cell::Other(_)), "Booleans are neither text nor numbers");
        assert_eq!(grid.height(), 6);
        assert_eq!(grid.width(), 7);
    }

    #[test]
    fn test_load_sheet_missing_sheet() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir);

        let err = load_sheet(&path, "Market").unwrap_err();
        assert!(matches!(err, LoadError::SheetMissing { ref sheet, .. } if sheet == "Market"), "Got {:?}", err);
    }

    #[test]
    fn test_load_sheet_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_sheet(dir.path().join("nope.xlsx"), "Firm").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }), "Got {:?}", err);
    }
}
