// src/extractors/locate.rs

// --- Imports ---
use crate::extractors::record::PeriodLabel;
use crate::workbook::{Cell, Coord, Grid};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns for Cell Classification (Lazy Static) ---
// Product tickers: whole cell, three or more uppercase letters/digits.
static PRODUCT_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z0-9]{3,}$").expect("Failed to compile PRODUCT_CODE_RE")
});

// Number following a "Period " prefix, anywhere later in the text.
static PERIOD_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Period\s*(\d+)").expect("Failed to compile PERIOD_NUMBER_RE")
});

// Column header that is nothing but "Period N".
static PERIOD_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Period\s+(\d+)$").expect("Failed to compile PERIOD_HEADER_RE")
});

/// First cell (lowest row, then lowest column) whose text contains `text`.
/// Case-sensitive substring match; later occurrences are ignored.
pub fn find_anchor(grid: &Grid, text: &str) -> Option<Coord> {
    let found = grid
        .cells()
        .find(|(_, cell)| cell.as_text().is_some_and(|s| s.contains(text)))
        .map(|(coord, _)| coord);

    match found {
        Some(coord) => tracing::debug!("Anchor '{}' found at {}", text, coord),
        None => tracing::debug!("Anchor '{}' not found", text),
    }
    found
}

/// Number of the last "Period N" text met in scan order (not the largest).
pub fn find_last_period<'a, I>(cells: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells
        .into_iter()
        .filter_map(Cell::as_text)
        .filter(|s| s.starts_with("Period "))
        .filter_map(|s| PERIOD_NUMBER_RE.captures(s))
        .filter_map(|caps| parse_period_number(&caps[1]))
        .last()
}

/// Trimmed product code when the cell is a product ticker.
pub fn product_code(cell: &Cell) -> Option<&str> {
    cell.as_text()
        .map(str::trim)
        .filter(|s| PRODUCT_CODE_RE.is_match(s))
}

/// Period column label: "Period N" or (any case) "Cumulative".
pub fn period_label(cell: &Cell) -> Option<PeriodLabel> {
    let text = cell.as_text()?.trim();
    if text.eq_ignore_ascii_case("cumulative") {
        return Some(PeriodLabel::Cumulative);
    }
    PERIOD_HEADER_RE
        .captures(text)
        .and_then(|caps| parse_period_number(&caps[1]))
        .map(PeriodLabel::Period)
}

fn parse_period_number(digits: &str) -> Option<u64> {
    match digits.parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::trace!("Ignoring period number '{}': {}", digits, e);
            None
        }
    }
}

/// Whether `haystack` contains `needle`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[(usize, usize, &str)]) -> Grid {
        let height = cells.iter().map(|c| c.0).max().unwrap_or(0) + 1;
        let width = cells.iter().map(|c| c.1).max().unwrap_or(0) + 1;
        let mut rows = vec![vec![Cell::Empty; width]; height];
        for (r, c, text) in cells {
            rows[*r][*c] = Cell::from(*text);
        }
        Grid::from_rows(rows)
    }

    #[test]
    fn test_find_anchor_unique() {
        let grid = grid_with(&[(3, 4, "Company Profit & Loss Statement"), (1, 1, "Firm")]);
        assert_eq!(
            find_anchor(&grid, "Profit & Loss"),
            Some(Coord::new(3, 4))
        );
    }

    #[test]
    fn test_find_anchor_absent() {
        let grid = grid_with(&[(0, 0, "Firm"), (2, 2, "product contribution")]);
        assert_eq!(find_anchor(&grid, "Product Contribution"), None, "Match is case-sensitive");
    }

    #[test]
    fn test_find_anchor_first_in_row_major_order() {
        let grid = grid_with(&[
            (5, 1, "Product Contribution (2)"),
            (2, 7, "Product Contribution"),
            (2, 3, "Product Contribution by brand"),
        ]);
        assert_eq!(find_anchor(&grid, "Product Contribution"), Some(Coord::new(2, 3)));
    }

    #[test]
    fn test_find_last_period_is_scan_order_not_max() {
        let grid = grid_with(&[(5, 0, "Period 3"), (10, 0, "Period 7"), (12, 2, "Periodic")]);
        let cells: Vec<&Cell> = grid.cells().map(|(_, cell)| cell).collect();
        assert_eq!(find_last_period(cells), Some(7));

        let grid = grid_with(&[(5, 0, "Period 9"), (10, 0, "Period 2")]);
        assert_eq!(find_last_period(grid.cells().map(|(_, cell)| cell)), Some(2));
    }

    #[test]
    fn test_find_last_period_requires_prefix() {
        let grid = grid_with(&[(0, 0, "Results for Period 4"), (1, 0, "Period 6 - Berlin")]);
        assert_eq!(find_last_period(grid.cells().map(|(_, cell)| cell)), Some(6));

        let grid = grid_with(&[(0, 0, "Results for Period 4")]);
        assert_eq!(find_last_period(grid.cells().map(|(_, cell)| cell)), None);
    }

    #[test]
    fn test_find_last_period_keeps_large_numbers() {
        let grid = grid_with(&[(0, 0, "Period 3"), (1, 0, "Period 99999999999")]);
        assert_eq!(find_last_period(grid.cells().map(|(_, cell)| cell)), Some(99_999_999_999));
        assert_eq!(
            period_label(&Cell::from("Period 99999999999")),
            Some(PeriodLabel::Period(99_999_999_999))
        );
    }

    #[test]
    fn test_product_code_classification() {
        assert_eq!(product_code(&Cell::from("ABC")), Some("ABC"));
        assert_eq!(product_code(&Cell::from("AB12")), Some("AB12"));
        assert_eq!(product_code(&Cell::from(" SEMI ")), Some("SEMI"), "Trimmed before matching");
        assert_eq!(product_code(&Cell::from("AB")), None, "Too short");
        assert_eq!(product_code(&Cell::from("abc")), None, "Lowercase");
        assert_eq!(product_code(&Cell::from("A1 ")), None, "Only two characters after trimming");
        assert_eq!(product_code(&Cell::from("AB C")), None, "Whole-cell token only");
        assert_eq!(product_code(&Cell::Number(123.0)), None);
    }

    #[test]
    fn test_period_label_classification() {
        assert_eq!(period_label(&Cell::from("Period 3")), Some(PeriodLabel::Period(3)));
        assert_eq!(period_label(&Cell::from(" Period 12 ")), Some(PeriodLabel::Period(12)));
        assert_eq!(period_label(&Cell::from("CUMULATIVE")), Some(PeriodLabel::Cumulative));
        assert_eq!(period_label(&Cell::from("Period 3 forecast")), None);
        assert_eq!(period_label(&Cell::from("Periods")), None);
        assert_eq!(period_label(&Cell::Number(3.0)), None);
    }
}
