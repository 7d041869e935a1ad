// src/workbook/grid.rs
use serde::Serialize;
use std::fmt;

/// One worksheet cell, as far as layout discovery cares.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Booleans, dates, durations and error values. Neither text nor numeric.
    Other(String),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Raw string content, untrimmed. Only `Text` cells count as strings.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Trimmed string content, `None` for non-text or whitespace-only cells.
    pub fn non_blank_text(&self) -> Option<&str> {
        self.as_text().map(str::trim).filter(|s| !s.is_empty())
    }

    /// A well-formed, finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::Other(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) | Cell::Other(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Zero-based (row, column) position in a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular, read-only cell grid for a single sheet.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from ragged rows, padding short rows with `Cell::Empty`.
    pub fn from_rows(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at an absolute position; out-of-bounds reads are empty.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Every cell in row-major order (lowest row first, then lowest column).
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (Coord::new(r, c), cell))
        })
    }

    /// Bounded view starting at `anchor.row` and one column left of `anchor.col`.
    ///
    /// Rows span `[anchor.row, anchor.row + rows)`; columns span
    /// `[max(0, anchor.col - 1), anchor.col + cols)`. Both are clipped to the grid.
    pub fn window(&self, anchor: Coord, rows: usize, cols: usize) -> Window<'_> {
        let origin = Coord::new(anchor.row, anchor.col.saturating_sub(1));
        let end_col = anchor.col.saturating_add(cols);
        self.region(origin, rows, end_col.saturating_sub(origin.col))
    }

    /// Plain `rows` x `cols` view starting exactly at `origin`, clipped to the grid.
    pub fn region(&self, origin: Coord, rows: usize, cols: usize) -> Window<'_> {
        let end_row = origin.row.saturating_add(rows).min(self.height());
        let end_col = origin.col.saturating_add(cols).min(self.width());

        Window {
            grid: self,
            origin,
            height: end_row.saturating_sub(origin.row),
            width: end_col.saturating_sub(origin.col),
        }
    }
}

/// Window-relative view into a [`Grid`]. Never outlives the grid it borrows.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    grid: &'a Grid,
    origin: Coord,
    height: usize,
    width: usize,
}

impl<'a> Window<'a> {
    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell at a window-relative position; anything outside the window is empty.
    pub fn get(&self, row: usize, col: usize) -> &'a Cell {
        if row >= self.height || col >= self.width {
            return &EMPTY;
        }
        self.grid.get(self.origin.row + row, self.origin.col + col)
    }

    /// Translates a window-relative position back to sheet coordinates.
    pub fn absolute(&self, row: usize, col: usize) -> Coord {
        Coord::new(self.origin.row + row, self.origin.col + col)
    }

    /// Cells of one window row, left to right, with their window column index.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, &'a Cell)> + 'a {
        let window = *self;
        (0..window.width).map(move |c| (c, window.get(row, c)))
    }

    /// Every window cell in row-major order, window-relative.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &'a Cell)> + 'a {
        let window = *self;
        (0..window.height).flat_map(move |r| window.row(r).map(move |(c, cell)| (Coord::new(r, c), cell)))
    }
}
